//! Job input interface
//!
//! The runner exposes action inputs as `INPUT_<NAME>` environment variables:
//! name uppercased, spaces replaced with underscores, dashes kept as-is.

use crate::error::SessionError;

/// Source of named job inputs
pub trait InputSource {
    /// Read a required input. An absent or empty value is an error.
    fn get(&self, name: &str) -> Result<String, SessionError>;
}

/// Reads inputs from the `INPUT_*` environment variables set by the runner
pub struct EnvInputs;

impl InputSource for EnvInputs {
    fn get(&self, name: &str) -> Result<String, SessionError> {
        let key = format!("INPUT_{}", name.replace(' ', "_").to_uppercase());
        match std::env::var(&key) {
            Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            _ => Err(SessionError::MissingInput(name.to_string())),
        }
    }
}
