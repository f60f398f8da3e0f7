//! Session Terminator: the job's post phase
//!
//! Reads the recorded session id and issues one best-effort terminate call.
//! No retry: the session expires server-side anyway, so a failed teardown
//! only costs the report message.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::process::ExitCode;

use futures_util::FutureExt;
use serde::Deserialize;
use tracing::debug;

use crate::error::SessionError;
use crate::github::{Reporter, StateStore};
use crate::session::SESSION_ID_KEY;

/// Remote termination call for an established session
pub trait TerminateSession {
    /// Terminate the session with the given id, exactly once.
    fn terminate(&self, session_id: &str) -> impl Future<Output = Result<(), SessionError>> + Send;
}

/// Terminates sessions through `aws ssm terminate-session`
pub struct SsmClient {
    region: Option<String>,
}

impl SsmClient {
    /// Region comes from `AWS_DEFAULT_REGION`. When unset, no `--region` is
    /// passed and the AWS CLI's own default-region resolution applies.
    pub fn from_env() -> Self {
        Self {
            region: std::env::var("AWS_DEFAULT_REGION").ok(),
        }
    }
}

/// Response payload of the terminate-session call
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TerminateSessionResponse {
    session_id: Option<String>,
}

impl TerminateSession for SsmClient {
    async fn terminate(&self, session_id: &str) -> Result<(), SessionError> {
        let mut command = tokio::process::Command::new("aws");
        command.args([
            "ssm",
            "terminate-session",
            "--session-id",
            session_id,
            "--output",
            "json",
        ]);
        if let Some(region) = &self.region {
            command.args(["--region", region]);
        }

        let output = command
            .output()
            .await
            .map_err(|err| SessionError::Terminate(err.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(SessionError::Terminate(stderr));
        }

        if let Ok(response) = serde_json::from_slice::<TerminateSessionResponse>(&output.stdout) {
            if let Some(id) = response.session_id {
                debug!("Terminated session {}", id);
            }
        }

        Ok(())
    }
}

/// The job's teardown phase
pub struct Terminator<C, S, P> {
    client: C,
    state: S,
    reporter: P,
}

impl<C, S, P> Terminator<C, S, P>
where
    C: TerminateSession,
    S: StateStore,
    P: Reporter,
{
    /// Create a terminator over the given collaborators
    pub fn new(client: C, state: S, reporter: P) -> Self {
        Self {
            client,
            state,
            reporter,
        }
    }

    /// Run the phase with the same boundary semantics as the starter: one
    /// report per failure, panics collapse to the fixed generic message.
    pub async fn run(self) -> ExitCode {
        let Self {
            client,
            state,
            reporter,
        } = self;

        let outcome = AssertUnwindSafe(Self::execute(&client, &state, &reporter))
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

    async fn execute(client: &C, state: &S, reporter: &P) -> Result<(), SessionError> {
        // A start phase that failed before persisting leaves no id behind;
        // terminating an empty identifier would only raise a spurious
        // validation error during teardown.
        let Some(session_id) = state.load(SESSION_ID_KEY).filter(|id| !id.is_empty()) else {
            reporter.info("No session id recorded; nothing to terminate");
            return Ok(());
        };

        debug!("Terminating session {}", session_id);
        client.terminate(&session_id).await
    }
}
