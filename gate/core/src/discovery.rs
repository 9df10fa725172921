use tracing::{debug, warn};

use crate::runtime::{ContainerRuntime, RuntimeError};

/// One container belonging to the compose project.
///
/// `service_name` may be empty when the runtime's label lookup failed; that
/// is degraded but not fatal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposeService {
    pub container_id: String,
    pub service_name: String,
}

/// Fatal discovery failures: the gate cannot proceed without at least one
/// known service.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("failed to list containers for project '{project}': {source}")]
    Listing {
        project: String,
        #[source]
        source: RuntimeError,
    },
    #[error("no containers found for project '{project}'")]
    NoContainers { project: String },
}

/// Resolve the set of containers carrying the project label, with their
/// compose service names. Order follows the runtime's listing order.
pub async fn discover_services<R>(
    runtime: &R,
    project: &str,
) -> Result<Vec<ComposeService>, DiscoveryError>
where
    R: ContainerRuntime + ?Sized,
{
    let container_ids = runtime
        .list_containers_by_label(project)
        .await
        .map_err(|source| DiscoveryError::Listing {
            project: project.to_owned(),
            source,
        })?;

    if container_ids.is_empty() {
        return Err(DiscoveryError::NoContainers {
            project: project.to_owned(),
        });
    }

    let mut services = Vec::with_capacity(container_ids.len());
    for container_id in container_ids {
        let service_name = match runtime.inspect_labels(&container_id).await {
            Ok(name) => name,
            Err(err) => {
                warn!(
                    container = %container_id,
                    error = %err,
                    "service name lookup failed; continuing with empty name"
                );
                String::new()
            }
        };

        debug!(container = %container_id, service = %service_name, "discovered compose service");
        services.push(ComposeService {
            container_id,
            service_name,
        });
    }

    Ok(services)
}
