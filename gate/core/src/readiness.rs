use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::{
    discovery::ComposeService,
    health::{HealthState, check_health},
    runtime::ContainerRuntime,
};

/// Outcome of one readiness-gate invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadinessReport {
    pub all_healthy: bool,
    pub tries_used: u32,
}

/// A health inspection failed mid-gate. Aborts immediately regardless of
/// remaining retry budget.
#[derive(Debug, thiserror::Error)]
#[error(
    "health inspection failed for service '{service_name}' (container {container_id}) on round {round}"
)]
pub struct InspectionError {
    pub container_id: String,
    pub service_name: String,
    pub round: u32,
}

/// Poll all services until every one reports healthy in the same round, or
/// the retry budget is exhausted.
///
/// Every round sleeps `interval` before checking, including the first; when
/// the services never become healthy exactly `max_tries` rounds run. Checks
/// within a round are sequential in discovery order, and an `Unknown` state
/// aborts the round immediately.
pub async fn wait_until_ready<R>(
    runtime: &R,
    services: &[ComposeService],
    interval: Duration,
    max_tries: u32,
) -> Result<ReadinessReport, InspectionError>
where
    R: ContainerRuntime + ?Sized,
{
    let mut round: u32 = 1;
    loop {
        sleep(interval).await;

        let mut all_healthy = true;
        for service in services {
            let state = check_health(runtime, &service.container_id).await;
            debug!(
                round,
                service = %service.service_name,
                container = %service.container_id,
                state = ?state,
                "health poll"
            );

            match state {
                HealthState::Healthy => {}
                HealthState::NotHealthy => all_healthy = false,
                HealthState::Unknown => {
                    return Err(InspectionError {
                        container_id: service.container_id.clone(),
                        service_name: service.service_name.clone(),
                        round,
                    });
                }
            }
        }

        if all_healthy {
            info!(round, "all services healthy");
            return Ok(ReadinessReport {
                all_healthy: true,
                tries_used: round,
            });
        }

        if round >= max_tries {
            return Ok(ReadinessReport {
                all_healthy: false,
                tries_used: max_tries,
            });
        }

        info!(round, max_tries, "services not yet healthy; retrying");
        round += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        path::Path,
        sync::Mutex,
    };

    use crate::{
        env::EnvEntry,
        runtime::{ContainerRuntime, RuntimeError},
    };

    use super::*;

    const INTERVAL: Duration = Duration::from_secs(1);

    /// Scripted health responses per container; `None` entries simulate a
    /// failed inspection, the last entry repeats forever.
    struct ScriptedRuntime {
        scripts: HashMap<String, Vec<Option<&'static str>>>,
        calls: Mutex<HashMap<String, usize>>,
    }

    impl ScriptedRuntime {
        fn new(scripts: &[(&str, &[Option<&'static str>])]) -> Self {
            Self {
                scripts: scripts
                    .iter()
                    .map(|(id, script)| ((*id).to_owned(), script.to_vec()))
                    .collect(),
                calls: Mutex::new(HashMap::new()),
            }
        }

        fn calls_for(&self, container_id: &str) -> usize {
            self.calls
                .lock()
                .expect("calls lock")
                .get(container_id)
                .copied()
                .unwrap_or(0)
        }
    }

    #[async_trait::async_trait]
    impl ContainerRuntime for ScriptedRuntime {
        async fn up(&self, _: &Path, _: &str, _: &[EnvEntry]) -> Result<(), RuntimeError> {
            unreachable!("readiness tests never start the stack")
        }

        async fn list_containers_by_label(&self, _: &str) -> Result<Vec<String>, RuntimeError> {
            unreachable!("readiness tests never list containers")
        }

        async fn inspect_health(&self, container_id: &str) -> Result<String, RuntimeError> {
            let mut calls = self.calls.lock().expect("calls lock");
            let index = calls.entry(container_id.to_owned()).or_insert(0);
            let script = self.scripts.get(container_id).expect("scripted container");
            let entry = script.get(*index).unwrap_or_else(|| {
                script.last().expect("non-empty script")
            });
            *index += 1;

            match entry {
                Some(status) => Ok((*status).to_owned()),
                None => Err(RuntimeError::new(anyhow::anyhow!("inspect exploded"))),
            }
        }

        async fn inspect_labels(&self, _: &str) -> Result<String, RuntimeError> {
            unreachable!("readiness tests never read labels")
        }

        async fn port_mappings_for(&self, _: &str) -> Result<String, RuntimeError> {
            unreachable!("readiness tests never read ports")
        }
    }

    fn service(container_id: &str) -> ComposeService {
        ComposeService {
            container_id: container_id.to_owned(),
            service_name: format!("svc-{container_id}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_the_first_all_healthy_round() {
        let runtime = ScriptedRuntime::new(&[(
            "db",
            &[Some("starting"), Some("starting"), Some("healthy")],
        )]);

        let report = wait_until_ready(&runtime, &[service("db")], INTERVAL, 5)
            .await
            .expect("gate result");

        assert_eq!(
            report,
            ReadinessReport {
                all_healthy: true,
                tries_used: 3
            }
        );
        assert_eq!(runtime.calls_for("db"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_after_exactly_max_tries_rounds() {
        let runtime = ScriptedRuntime::new(&[("db", &[Some("starting")])]);

        let report = wait_until_ready(&runtime, &[service("db")], INTERVAL, 4)
            .await
            .expect("gate result");

        assert_eq!(
            report,
            ReadinessReport {
                all_healthy: false,
                tries_used: 4
            }
        );
        assert_eq!(runtime.calls_for("db"), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn services_healthy_in_different_rounds_never_count_as_ready() {
        // "a" and "b" alternate so that both are never healthy in the same
        // round.
        let runtime = ScriptedRuntime::new(&[
            ("a", &[Some("healthy"), Some("starting"), Some("healthy"), Some("starting")]),
            ("b", &[Some("starting"), Some("healthy"), Some("starting"), Some("healthy")]),
        ]);

        let report = wait_until_ready(&runtime, &[service("a"), service("b")], INTERVAL, 4)
            .await
            .expect("gate result");

        assert!(!report.all_healthy);
        assert_eq!(report.tries_used, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn inspection_failure_aborts_the_round_immediately() {
        let runtime = ScriptedRuntime::new(&[
            ("a", &[Some("starting"), None]),
            ("b", &[Some("starting")]),
        ]);

        let err = wait_until_ready(&runtime, &[service("a"), service("b")], INTERVAL, 10)
            .await
            .expect_err("inspection failure");

        assert_eq!(err.container_id, "a");
        assert_eq!(err.round, 2);
        // "b" is never checked in the aborted round.
        assert_eq!(runtime.calls_for("b"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn first_round_waits_one_full_interval() {
        let runtime = ScriptedRuntime::new(&[("db", &[Some("healthy")])]);
        let started = tokio::time::Instant::now();

        let report = wait_until_ready(&runtime, &[service("db")], INTERVAL, 1)
            .await
            .expect("gate result");

        assert!(report.all_healthy);
        assert!(started.elapsed() >= INTERVAL);
    }
}
