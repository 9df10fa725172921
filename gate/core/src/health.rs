use tracing::warn;

use crate::runtime::ContainerRuntime;

/// Health of one container as seen in a single poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthState {
    Healthy,
    NotHealthy,
    /// The inspection itself failed. Terminal for the whole gate, unlike
    /// `NotHealthy` which simply keeps polling.
    Unknown,
}

impl HealthState {
    /// Map a runtime-reported status string. Only the literal `healthy`
    /// counts; every other well-formed status (`starting`, `unhealthy`,
    /// `none`) is still-not-ready.
    #[must_use]
    pub fn from_status(status: &str) -> Self {
        if status.trim() == "healthy" {
            Self::Healthy
        } else {
            Self::NotHealthy
        }
    }

    #[must_use]
    pub const fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy)
    }
}

/// Poll one container's health once. Retry policy belongs to the caller.
pub async fn check_health<R>(runtime: &R, container_id: &str) -> HealthState
where
    R: ContainerRuntime + ?Sized,
{
    match runtime.inspect_health(container_id).await {
        Ok(status) => HealthState::from_status(&status),
        Err(err) => {
            warn!(container = %container_id, error = %err, "health inspection failed");
            HealthState::Unknown
        }
    }
}
