// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local persistence for the Textrack ledger.
//!
//! Two [`KeyValueStore`](textrack_core::KeyValueStore) implementations
//! ([`FileStore`] for real use, [`MemoryStore`] for tests) and
//! [`LedgerStore`], which owns the record and session keys on top of any
//! store.

pub mod file;
pub mod ledger_store;
pub mod memory;

pub use file::FileStore;
pub use ledger_store::{LedgerStore, RECORDS_KEY, SESSION_KEY};
pub use memory::MemoryStore;
