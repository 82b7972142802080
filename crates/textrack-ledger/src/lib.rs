// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Textrack ledger: record lifecycle and the views derived from it.
//!
//! - [`RecordRepository`]: ownership-gated create / update / delete over
//!   the persisted record list
//! - [`query`]: free-text search and grouping by entry date
//! - [`form`]: field validation and AI-suggestion merging for drafts
//! - [`InsightService`]: AI calls with fallback and per-endpoint in-flight guards

pub mod dashboard;
pub mod form;
pub mod insight;
pub mod query;
pub mod repository;

pub use dashboard::LedgerSummary;
pub use form::RecordDraft;
pub use insight::{AI_FALLBACK_MESSAGE, InsightService, OfflineInsight};
pub use query::{DateGroup, filter, group_by_date};
pub use repository::RecordRepository;
