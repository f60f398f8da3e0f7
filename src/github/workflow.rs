//! Workflow commands for the job log

/// Job-visible reporting surface
pub trait Reporter {
    /// Write an informational line to the job log.
    fn info(&self, message: &str);

    /// Mark the job step failed with a single human-readable message.
    fn set_failed(&self, message: &str);
}

/// Reports through GitHub Actions workflow commands on stdout
pub struct GithubReporter;

impl Reporter for GithubReporter {
    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn set_failed(&self, message: &str) {
        println!("::error::{}", escape_data(message));
    }
}

/// Escape the data payload of a workflow command.
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a workflow command property (the `name=` side).
pub fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
