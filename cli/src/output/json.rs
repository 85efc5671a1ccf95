//! JSON output helpers.
//!
//! Provides the error-object formatter used by all `--json` code paths when
//! a command fails, and the success document for `deploy`.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::error::DeployFailure;

/// Format a failed deployment as a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "...",
///   "step": "...",
///   "trace": ["idle", "...", "failed"]
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_failure(failure: &DeployFailure) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": failure.error.to_string(),
        "code": failure.error.code(),
        "step": failure.step,
        "trace": failure.trace,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Pretty-print any serializable value.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_value(value: &impl Serialize) -> Result<String> {
    serde_json::to_string_pretty(value).context("JSON serialization failed")
}
