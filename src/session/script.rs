//! Subprocess contract for the connection-establishing script
//!
//! The script is an opaque executable: it takes `-t/-h/-p/-l` flags, prints
//! the session-id line on stdout when it succeeds, and signals failure with
//! a non-zero exit code and/or anything on stderr.

use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::debug;

use crate::error::SessionError;
use crate::session::SCRIPT_NAME;

/// Captured result of one script run
#[derive(Debug, Clone, Default)]
pub struct ScriptOutput {
    /// Exit code, -1 when the script was killed by a signal
    pub exit_code: i32,
    /// Full stdout text
    pub stdout: String,
    /// Full stderr text
    pub stderr: String,
}

/// Runs the connection script and captures its combined output
pub trait ScriptRunner {
    /// Spawn the script with the given argument vector and wait for it.
    fn run(
        &self,
        args: &[String],
    ) -> impl Future<Output = Result<ScriptOutput, SessionError>> + Send;
}

/// The bundled port-forwarding script, spawned as a child process
pub struct ForwardingScript {
    path: Option<PathBuf>,
}

impl ForwardingScript {
    /// Use the script shipped next to the current executable
    pub fn bundled() -> Self {
        Self { path: None }
    }

    /// Use a script at an explicit path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    fn resolve_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        let exe = std::env::current_exe().context("Failed to locate the current executable")?;
        let dir = exe
            .parent()
            .context("Executable path has no parent directory")?;
        Ok(dir.join(SCRIPT_NAME))
    }
}

impl ScriptRunner for ForwardingScript {
    async fn run(&self, args: &[String]) -> Result<ScriptOutput, SessionError> {
        let path = self
            .resolve_path()
            .map_err(|err| SessionError::Launch(format!("{err:#}")))?;

        debug!("Spawning {} with {:?}", path.display(), args);

        let mut child = tokio::process::Command::new(&path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| SessionError::Launch(err.to_string()))?;

        let mut stdout_pipe = child
            .stdout
            .take()
            .ok_or_else(|| SessionError::Launch("Failed to open stdout pipe".to_string()))?;
        let mut stderr_pipe = child
            .stderr
            .take()
            .ok_or_else(|| SessionError::Launch("Failed to open stderr pipe".to_string()))?;

        // Drain both pipes concurrently and all the way to EOF, so neither
        // buffer is truncated when the exit status arrives. The two readers
        // have no ordering guarantee between them. stdout chunks are
        // mirrored to the job log as they come in.
        let stdout_task = async {
            let mut log = tokio::io::stdout();
            let mut buffer = String::new();
            let mut buf = [0u8; 4096];
            loop {
                match stdout_pipe.read(&mut buf).await {
                    Ok(0) => break,
                    Ok(n) => {
                        let _ = log.write_all(&buf[..n]).await;
                        let _ = log.flush().await;
                        buffer.push_str(&String::from_utf8_lossy(&buf[..n]));
                    }
                    Err(err) => {
                        debug!("Script stdout read error: {}", err);
                        break;
                    }
                }
            }
            buffer
        };
        let stderr_task = async {
            let mut buffer = String::new();
            let mut buf = [0u8; 4096];
            loop {
                match stderr_pipe.read(&mut buf).await {
                    Ok(0) => break,
                    Ok(n) => buffer.push_str(&String::from_utf8_lossy(&buf[..n])),
                    Err(err) => {
                        debug!("Script stderr read error: {}", err);
                        break;
                    }
                }
            }
            buffer
        };

        let (stdout, stderr) = tokio::join!(stdout_task, stderr_task);

        let status = child
            .wait()
            .await
            .map_err(|err| SessionError::Launch(err.to_string()))?;
        let exit_code = status.code().unwrap_or(-1);
        debug!("Forwarding script exited with code {}", exit_code);

        Ok(ScriptOutput {
            exit_code,
            stdout,
            stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn write_script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("connect.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_captures_stdout_and_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), r#"echo "Session established with ID: test-id""#);

        let output = ForwardingScript::at(script).run(&[]).await.unwrap();
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout, "Session established with ID: test-id\n");
        assert_eq!(output.stderr, "");
    }

    #[tokio::test]
    async fn test_captures_stderr_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(
            dir.path(),
            "echo \"Usage: $0 [-t target] [-h host] [-p port] [-l local_port]\" >&2\nexit 1",
        );

        let output = ForwardingScript::at(&script).run(&[]).await.unwrap();
        assert_eq!(output.exit_code, 1);
        assert_eq!(
            output.stderr,
            format!(
                "Usage: {} [-t target] [-h host] [-p port] [-l local_port]\n",
                script.display()
            )
        );
    }

    #[tokio::test]
    async fn test_arguments_reach_the_script() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), r#"echo "$@""#);

        let args: Vec<String> = ["-t", "test-target", "-h", "test-host"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let output = ForwardingScript::at(script).run(&args).await.unwrap();
        assert_eq!(output.stdout, "-t test-target -h test-host\n");
    }

    #[tokio::test]
    async fn test_large_output_is_fully_drained() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(
            dir.path(),
            "i=0\nwhile [ $i -lt 2000 ]; do echo \"line $i\"; i=$((i+1)); done\necho \"Session established with ID: s-last\"",
        );

        let output = ForwardingScript::at(script).run(&[]).await.unwrap();
        assert_eq!(output.exit_code, 0);
        assert!(output.stdout.contains("line 0\n"));
        assert!(output.stdout.contains("line 1999\n"));
        assert!(output.stdout.ends_with("Session established with ID: s-last\n"));
    }

    #[tokio::test]
    async fn test_missing_executable_is_a_launch_error() {
        let err = ForwardingScript::at("/nonexistent/connect.sh")
            .run(&[])
            .await
            .unwrap_err();
        assert!(matches!(&err, SessionError::Launch(_)));
        assert!(err.to_string().contains("No such file or directory"));
    }
}
