use std::{io, process::ExitStatus, time::Duration};

use tokio::{process::Command, time::timeout};

/// Errors running docker CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum DockerCommandError {
    #[error("{command} exited with status {status}: {stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("{command} timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },
}

/// Run a docker command to completion, discarding its output.
pub async fn run_docker_command(
    command: Command,
    description: &str,
    timeout_duration: Duration,
) -> Result<(), DockerCommandError> {
    capture_docker_output(command, description, timeout_duration)
        .await
        .map(|_| ())
}

/// Run a docker command and return its stdout; a non-zero exit carries the
/// trimmed stderr in the error for attribution.
pub async fn capture_docker_output(
    mut command: Command,
    description: &str,
    timeout_duration: Duration,
) -> Result<String, DockerCommandError> {
    let output = match timeout(timeout_duration, command.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(source)) => {
            return Err(DockerCommandError::Spawn {
                command: description.to_owned(),
                source,
            });
        }
        Err(_) => {
            return Err(DockerCommandError::Timeout {
                command: description.to_owned(),
                timeout: timeout_duration,
            });
        }
    };

    if !output.status.success() {
        return Err(DockerCommandError::Failed {
            command: description.to_owned(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
