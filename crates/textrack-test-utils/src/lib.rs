// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Textrack integration tests.
//!
//! - [`MockInsight`] - insight provider with queued replies and call counters
//! - [`TestHarness`] - the full ledger stack over an in-memory store

pub mod harness;
pub mod mock_insight;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_insight::MockInsight;
