// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Every adapter extends the [`PluginAdapter`] base trait so the CLI can
//! report identity and health uniformly.

pub mod adapter;
pub mod insight;
pub mod store;

pub use adapter::PluginAdapter;
pub use insight::InsightProvider;
pub use store::KeyValueStore;
