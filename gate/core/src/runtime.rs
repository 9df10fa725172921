use std::path::Path;

use crate::env::EnvEntry;

/// Failure reported by a container runtime operation.
#[derive(Debug, thiserror::Error)]
#[error("container runtime failure: {source}")]
pub struct RuntimeError {
    #[source]
    source: anyhow::Error,
}

impl RuntimeError {
    pub fn new(source: impl Into<anyhow::Error>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Operations the gate requires from a container runtime.
///
/// Every method reports success or failure distinctly from its payload;
/// interpreting the payload (health status strings, raw port text) is the
/// caller's concern.
#[async_trait::async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Start the declared services once. Environment entries are passed
    /// explicitly; implementations must not mutate process-global state.
    async fn up(
        &self,
        compose_file: &Path,
        project: &str,
        env: &[EnvEntry],
    ) -> Result<(), RuntimeError>;

    /// List ids of all containers (running or not) labelled with the project.
    async fn list_containers_by_label(&self, project: &str) -> Result<Vec<String>, RuntimeError>;

    /// The runtime-reported health status string for one container.
    async fn inspect_health(&self, container_id: &str) -> Result<String, RuntimeError>;

    /// The compose service name label of one container.
    async fn inspect_labels(&self, container_id: &str) -> Result<String, RuntimeError>;

    /// Raw port-mapping text for one container, one mapping per line.
    /// Empty text means the container exposes no ports.
    async fn port_mappings_for(&self, container_id: &str) -> Result<String, RuntimeError>;
}
