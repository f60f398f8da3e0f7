//! Failure taxonomy for both job phases
//!
//! The `Display` string of each variant is exactly what gets reported to the
//! job via `set_failed`, so the variants carry user-visible messages verbatim.

use thiserror::Error;

/// Errors raised by the start and stop phases
#[derive(Debug, Error)]
pub enum SessionError {
    /// A required job input was not supplied
    #[error("Input required and not supplied: {0}")]
    MissingInput(String),

    /// The forwarding script could not be started at all
    #[error("{0}")]
    Launch(String),

    /// The forwarding script ran but failed: non-zero exit or anything on
    /// stderr. The message is the full stderr text (often a usage string).
    #[error("{0}")]
    ScriptFailed(String),

    /// The script looked successful but its output had no session-id line
    #[error("Failed to extract session ID")]
    ExtractSessionId,

    /// The remote terminate-session call failed
    #[error("{0}")]
    Terminate(String),

    /// The state backend could not persist the session id
    #[error("{0}")]
    State(String),

    /// Catch-all for failure values that carry no usable message.
    /// Rendered for panics caught at the phase boundary; the payload is
    /// never included in the report.
    #[error("Unexpected error")]
    Unexpected,
}
