// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity and health reporting for pluggable backends.

use async_trait::async_trait;

use crate::error::TextrackError;
use crate::types::{AdapterType, HealthStatus};

/// Implemented by the file store and every insight provider, so `doctor`
/// can report on them uniformly.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Short name shown in logs and diagnostics, e.g. `"gemini"`.
    fn name(&self) -> &str;

    fn version(&self) -> semver::Version;

    fn adapter_type(&self) -> AdapterType;

    /// Local readiness check. Must not make network requests.
    async fn health_check(&self) -> Result<HealthStatus, TextrackError>;
}
