// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Textrack production ledger.
//!
//! Holds the record model, the shared error type, and the adapter traits
//! (key-value store, AI insight provider) that the other crates implement.

pub mod error;
pub mod traits;
pub mod types;

pub use error::TextrackError;
pub use types::{
    AdapterType, Confirmation, DeleteOutcome, HealthStatus, Record, RecordFields, RecordPatch,
    SessionContext, SessionId,
};

pub use traits::{InsightProvider, KeyValueStore, PluginAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_type_display_round_trips() {
        use std::str::FromStr;

        for variant in [AdapterType::Store, AdapterType::Insight] {
            let parsed = AdapterType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn confirmation_from_bool() {
        assert_eq!(Confirmation::from(true), Confirmation::Confirmed);
        assert_eq!(Confirmation::from(false), Confirmation::Declined);
    }

    #[test]
    fn permission_denied_is_detectable() {
        let err = TextrackError::PermissionDenied {
            id: "abc1234".into(),
            actor: "user_x".into(),
        };
        assert!(err.is_permission_denied());
        assert!(err.to_string().contains("abc1234"));
        assert!(!TextrackError::Internal("x".into()).is_permission_denied());
    }

    #[test]
    fn all_traits_are_object_safe() {
        fn _store(_: &dyn KeyValueStore) {}
        fn _insight(_: &dyn InsightProvider) {}
        fn _adapter(_: &dyn PluginAdapter) {}
    }
}
