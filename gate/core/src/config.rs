use std::{
    path::PathBuf,
    time::Duration,
};

/// Default compose file looked up in the working directory.
pub const DEFAULT_COMPOSE_FILE: &str = "docker-compose.yml";

/// Default sleep between health-poll rounds.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Minimum accepted poll interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default retry budget for the readiness gate.
pub const DEFAULT_MAX_TRIES: u32 = 30;

/// Rejected gate configuration values.
#[derive(Debug, thiserror::Error)]
pub enum InvalidConfig {
    #[error("poll interval {interval:?} is below the minimum of {MIN_POLL_INTERVAL:?}")]
    IntervalTooSmall { interval: Duration },
    #[error("max tries must be at least 1")]
    ZeroTries,
    #[error("project name must not be empty")]
    EmptyProjectName,
}

/// Inputs for one orchestrated gate run.
#[derive(Clone, Debug)]
pub struct GateConfig {
    pub compose_file: PathBuf,
    pub project_name: String,
    pub env_file: Option<PathBuf>,
    pub poll_interval: Duration,
    pub max_tries: u32,
}

impl GateConfig {
    /// A config for the project with all documented defaults.
    #[must_use]
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            compose_file: PathBuf::from(DEFAULT_COMPOSE_FILE),
            project_name: project_name.into(),
            env_file: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_tries: DEFAULT_MAX_TRIES,
        }
    }

    #[must_use]
    pub fn with_compose_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.compose_file = path.into();
        self
    }

    #[must_use]
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub const fn with_max_tries(mut self, max_tries: u32) -> Self {
        self.max_tries = max_tries;
        self
    }

    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if self.project_name.trim().is_empty() {
            return Err(InvalidConfig::EmptyProjectName);
        }
        if self.poll_interval < MIN_POLL_INTERVAL {
            return Err(InvalidConfig::IntervalTooSmall {
                interval: self.poll_interval,
            });
        }
        if self.max_tries == 0 {
            return Err(InvalidConfig::ZeroTries);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(GateConfig::new("demo").validate().is_ok());
    }

    #[test]
    fn sub_minimum_interval_is_rejected() {
        let config = GateConfig::new("demo").with_poll_interval(Duration::from_millis(10));
        assert!(matches!(
            config.validate(),
            Err(InvalidConfig::IntervalTooSmall { .. })
        ));
    }

    #[test]
    fn zero_tries_is_rejected() {
        let config = GateConfig::new("demo").with_max_tries(0);
        assert!(matches!(config.validate(), Err(InvalidConfig::ZeroTries)));
    }

    #[test]
    fn empty_project_name_is_rejected() {
        let config = GateConfig::new("  ");
        assert!(matches!(
            config.validate(),
            Err(InvalidConfig::EmptyProjectName)
        ));
    }
}
