//! Error types for plane detection.

use thiserror::Error;

/// Result type for plane detection operations.
pub type DetectResult<T> = Result<T, DetectError>;

/// Errors that can occur when configuring plane detection.
///
/// Detection itself never fails: degenerate samples are skipped and an empty
/// cloud yields no planes.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum DetectError {
    /// A detection parameter is out of range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
