//! Session Starter: the job's main phase
//!
//! Reads the four connection inputs, runs the forwarding script, extracts
//! the session id from its output and records it for the stop phase.

use std::panic::AssertUnwindSafe;
use std::process::ExitCode;

use futures_util::FutureExt;
use tracing::debug;

use crate::error::SessionError;
use crate::github::{InputSource, Reporter, StateStore};
use crate::session::extract::extract_session_id;
use crate::session::script::ScriptRunner;
use crate::session::SESSION_ID_KEY;

/// The job's establish phase
pub struct Starter<I, S, R, P> {
    inputs: I,
    state: S,
    runner: R,
    reporter: P,
}

impl<I, S, R, P> Starter<I, S, R, P>
where
    I: InputSource,
    S: StateStore,
    R: ScriptRunner,
    P: Reporter,
{
    /// Create a starter over the given collaborators
    pub fn new(inputs: I, state: S, runner: R, reporter: P) -> Self {
        Self {
            inputs,
            state,
            runner,
            reporter,
        }
    }

    /// Run the phase.
    ///
    /// Every failure funnels to a single `set_failed` report at this
    /// boundary; a panic inside the phase is reported with the fixed
    /// generic message, never its payload.
    pub async fn run(self) -> ExitCode {
        let Self {
            inputs,
            state,
            runner,
            reporter,
        } = self;

        let outcome = AssertUnwindSafe(Self::execute(&inputs, &state, &runner, &reporter))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(())) => ExitCode::SUCCESS,
            Ok(Err(err)) => {
                reporter.set_failed(&err.to_string());
                ExitCode::FAILURE
            }
            Err(_) => {
                reporter.set_failed(&SessionError::Unexpected.to_string());
                ExitCode::FAILURE
            }
        }
    }

    async fn execute(
        inputs: &I,
        state: &S,
        runner: &R,
        reporter: &P,
    ) -> Result<(), SessionError> {
        let target = inputs.get("target")?;
        let host = inputs.get("host")?;
        let port = inputs.get("port")?;
        let local_port = inputs.get("local-port")?;

        reporter.info(&format!(
            "Establishing a session with target {target} and forwarding port {port} to {host}:{local_port}"
        ));

        let args = script_args(&target, &host, &port, &local_port);
        let output = runner.run(&args).await?;

        // Anything on stderr means failure, even with a clean exit code.
        if output.exit_code != 0 || !output.stderr.is_empty() {
            return Err(SessionError::ScriptFailed(output.stderr));
        }

        let session_id = extract_session_id(&output.stdout)?;
        debug!("Recording session id {}", session_id);
        state.save(SESSION_ID_KEY, &session_id)?;

        Ok(())
    }
}

/// Flag arguments for the forwarding script, in the fixed order its
/// getopts loop expects.
fn script_args(target: &str, host: &str, port: &str, local_port: &str) -> Vec<String> {
    vec![
        "-t".to_string(),
        target.to_string(),
        "-h".to_string(),
        host.to_string(),
        "-p".to_string(),
        port.to_string(),
        "-l".to_string(),
        local_port.to_string(),
    ]
}
