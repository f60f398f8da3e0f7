//! Cross-phase state handoff
//!
//! The runner hands the main step a state file (`$GITHUB_STATE`) to append
//! `key<<delimiter` heredoc blocks into, and re-exposes each saved entry to
//! the post step as a `STATE_<key>` environment variable. One writer (start
//! phase), one reader (stop phase), across two process lifetimes.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context};

use crate::error::SessionError;
use crate::github::workflow::{escape_data, escape_property};

/// Durable key-value handoff between the two job phases
pub trait StateStore {
    /// Persist a value for the post step to read.
    fn save(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Retrieve a value saved by the main step, if one was ever written.
    fn load(&self, key: &str) -> Option<String>;
}

/// State store backed by the GitHub Actions runner
pub struct GithubState;

impl StateStore for GithubState {
    fn save(&self, key: &str, value: &str) -> Result<(), SessionError> {
        match std::env::var_os("GITHUB_STATE") {
            Some(path) => append_file_command(Path::new(&path), key, value)
                .map_err(|err| SessionError::State(format!("{err:#}"))),
            // Older runners have no state file and take a stdout command.
            None => {
                println!(
                    "::save-state name={}::{}",
                    escape_property(key),
                    escape_data(value)
                );
                Ok(())
            }
        }
    }

    fn load(&self, key: &str) -> Option<String> {
        std::env::var(format!("STATE_{key}")).ok()
    }
}

/// Append one heredoc block to the runner's state file.
///
/// The random delimiter prevents a value that itself contains `key<<` lines
/// from smuggling extra entries into the file.
fn append_file_command(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
    if key.contains(&delimiter) {
        bail!("State key must not contain the delimiter {delimiter}");
    }
    if value.contains(&delimiter) {
        bail!("State value must not contain the delimiter {delimiter}");
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open state file {}", path.display()))?;
    writeln!(file, "{key}<<{delimiter}\n{value}\n{delimiter}")
        .with_context(|| format!("Failed to write state file {}", path.display()))?;

    Ok(())
}
