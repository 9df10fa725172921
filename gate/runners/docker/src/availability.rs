use std::{process::Stdio, time::Duration};

use tokio::{process::Command, time::timeout};

const DOCKER_INFO_TIMEOUT: Duration = Duration::from_secs(15);

/// The docker daemon cannot be reached from this host.
#[derive(Debug, thiserror::Error)]
#[error("docker does not appear to be available on this host")]
pub struct DockerUnavailable;

/// Checks that `docker info` succeeds within a timeout.
pub async fn ensure_docker_available() -> Result<(), DockerUnavailable> {
    let mut command = Command::new("docker");
    command
        .arg("info")
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let available = timeout(DOCKER_INFO_TIMEOUT, command.status())
        .await
        .ok()
        .and_then(Result::ok)
        .map(|status| status.success())
        .unwrap_or(false);

    if available {
        Ok(())
    } else {
        Err(DockerUnavailable)
    }
}
