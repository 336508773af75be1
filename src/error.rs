//! Error types for the admission and telemetry core

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the admission and telemetry core.
///
/// The request path itself is infallible by design: `allow` always answers
/// with a boolean and recording telemetry never fails the caller. Errors
/// exist only at construction time, where a misconfigured component should
/// refuse to start rather than silently misbehave.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
