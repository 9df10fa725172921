use std::{path::Path, time::Duration};

use async_trait::async_trait;
use compose_gate_core::{ContainerRuntime, EnvEntry, RuntimeError};
use tokio::process::Command;
use tracing::debug;

use crate::commands::{capture_docker_output, run_docker_command};

const COMPOSE_UP_TIMEOUT: Duration = Duration::from_secs(120);
const INSPECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Label compose applies to every container of a project.
pub const COMPOSE_PROJECT_LABEL: &str = "com.docker.compose.project";

/// Label carrying the compose service name.
pub const COMPOSE_SERVICE_LABEL: &str = "com.docker.compose.service";

/// `ContainerRuntime` backed by the docker CLI (`docker compose`, `docker
/// ps`, `docker inspect`, `docker port`).
#[derive(Clone, Copy, Debug, Default)]
pub struct DockerComposeRuntime;

impl DockerComposeRuntime {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ContainerRuntime for DockerComposeRuntime {
    async fn up(
        &self,
        compose_file: &Path,
        project: &str,
        env: &[EnvEntry],
    ) -> Result<(), RuntimeError> {
        let mut cmd = Command::new("docker");
        cmd.arg("compose")
            .arg("-f")
            .arg(compose_file)
            .arg("-p")
            .arg(project)
            .arg("up")
            .arg("-d");
        // The env file content is scoped to this child process, never
        // exported into our own environment.
        for entry in env {
            cmd.env(entry.key(), entry.value());
        }

        debug!(project, compose_file = %compose_file.display(), "docker compose up -d");
        run_docker_command(cmd, "docker compose up", COMPOSE_UP_TIMEOUT)
            .await
            .map_err(RuntimeError::new)
    }

    async fn list_containers_by_label(&self, project: &str) -> Result<Vec<String>, RuntimeError> {
        let mut cmd = Command::new("docker");
        cmd.arg("ps")
            .arg("-a")
            .arg("--filter")
            .arg(format!("label={COMPOSE_PROJECT_LABEL}={project}"))
            .arg("--format")
            .arg("{{.ID}}");

        let stdout = capture_docker_output(cmd, "docker ps", INSPECT_TIMEOUT)
            .await
            .map_err(RuntimeError::new)?;
        Ok(container_ids(&stdout))
    }

    async fn inspect_health(&self, container_id: &str) -> Result<String, RuntimeError> {
        let mut cmd = Command::new("docker");
        cmd.arg("inspect")
            .arg("--format")
            .arg("{{.State.Health.Status}}")
            .arg(container_id);

        let stdout = capture_docker_output(cmd, "docker inspect health", INSPECT_TIMEOUT)
            .await
            .map_err(RuntimeError::new)?;
        health_status(&stdout, container_id)
    }

    async fn inspect_labels(&self, container_id: &str) -> Result<String, RuntimeError> {
        let mut cmd = Command::new("docker");
        cmd.arg("inspect")
            .arg("--format")
            .arg(format!("{{{{index .Config.Labels \"{COMPOSE_SERVICE_LABEL}\"}}}}"))
            .arg(container_id);

        let stdout = capture_docker_output(cmd, "docker inspect labels", INSPECT_TIMEOUT)
            .await
            .map_err(RuntimeError::new)?;
        Ok(stdout.trim().to_owned())
    }

    async fn port_mappings_for(&self, container_id: &str) -> Result<String, RuntimeError> {
        let mut cmd = Command::new("docker");
        cmd.arg("port").arg(container_id);

        capture_docker_output(cmd, "docker port", INSPECT_TIMEOUT)
            .await
            .map_err(RuntimeError::new)
    }
}

fn container_ids(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Containers without a configured healthcheck make the template print
/// `<no value>`; that is an inspection failure, not a pollable state.
fn health_status(stdout: &str, container_id: &str) -> Result<String, RuntimeError> {
    let status = stdout.trim();
    if status.is_empty() || status == "<no value>" {
        return Err(RuntimeError::new(anyhow::anyhow!(
            "container {container_id} reports no health status"
        )));
    }
    Ok(status.to_owned())
}
