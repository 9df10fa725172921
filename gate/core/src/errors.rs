use std::path::PathBuf;

use crate::{
    config::InvalidConfig, discovery::DiscoveryError, env::EnvFileError, ports::MalformedMapping,
    readiness::InspectionError, runtime::RuntimeError,
};

/// Top-level gate failures, one variant per distinguishable outcome.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("compose file {} does not exist", path.display())]
    MissingComposeFile { path: PathBuf },
    #[error("env file {} does not exist", path.display())]
    MissingEnvFile { path: PathBuf },
    #[error(transparent)]
    EnvFile(#[from] EnvFileError),
    #[error(transparent)]
    InvalidConfig(#[from] InvalidConfig),
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error(transparent)]
    Inspection(#[from] InspectionError),
    #[error("services did not become healthy within {tries} tries")]
    ReadinessTimeout { tries: u32 },
    #[error("failed to fetch port mappings for service '{service}' (container {container})")]
    PortFetch {
        service: String,
        container: String,
        #[source]
        source: RuntimeError,
    },
    #[error("unparseable port mapping for service '{service}': {source}")]
    MalformedMapping {
        service: String,
        #[source]
        source: MalformedMapping,
    },
}

impl GateError {
    /// Stable process exit code for each failure class, so callers can tell
    /// the outcomes apart.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::MissingComposeFile { .. } => 10,
            Self::MissingEnvFile { .. } => 11,
            Self::EnvFile(_) => 12,
            Self::InvalidConfig(_) => 13,
            Self::Discovery(_) => 20,
            Self::Inspection(_) => 21,
            Self::ReadinessTimeout { .. } => 22,
            Self::PortFetch { .. } => 23,
            Self::MalformedMapping { .. } => 24,
        }
    }
}
