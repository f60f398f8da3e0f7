//! Session id extraction from script output

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::SessionError;

/// Success line the connection script prints once the session is up
static SESSION_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Session established with ID: (\S+)").expect("Invalid SESSION_ID_PATTERN regex")
});

/// Pull the session id out of the script's accumulated stdout.
///
/// The first match anywhere in the text wins; everything else in the output
/// is ignored. No match means the script cannot be trusted to have
/// established a session, a distinct failure the caller reports as-is.
pub fn extract_session_id(output: &str) -> Result<String, SessionError> {
    SESSION_ID_PATTERN
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(SessionError::ExtractSessionId)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extracts_id_from_success_line() {
        let id = extract_session_id("Session established with ID: test-id").unwrap();
        assert_eq!(id, "test-id");
    }

    #[test]
    fn test_extracts_id_surrounded_by_other_output() {
        let output = "Starting session...\nSession established with ID: s-0af12b\nForwarding...\n";
        assert_eq!(extract_session_id(output).unwrap(), "s-0af12b");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let output =
            "Session established with ID: first\nSession established with ID: second\n";
        assert_eq!(extract_session_id(output).unwrap(), "first");
    }

    #[test]
    fn test_id_stops_at_whitespace() {
        let output = "Session established with ID: s-123 trailing words";
        assert_eq!(extract_session_id(output).unwrap(), "s-123");
    }

    #[test]
    fn test_missing_line_is_a_distinct_error() {
        let err = extract_session_id("Connected, but no id line here").unwrap_err();
        assert_eq!(err.to_string(), "Failed to extract session ID");
    }

    #[test]
    fn test_empty_output_fails() {
        assert!(extract_session_id("").is_err());
    }
}
