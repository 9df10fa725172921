pub mod availability;
pub mod commands;
pub mod runtime;

pub use availability::{DockerUnavailable, ensure_docker_available};
pub use commands::{DockerCommandError, capture_docker_output, run_docker_command};
pub use runtime::{COMPOSE_PROJECT_LABEL, COMPOSE_SERVICE_LABEL, DockerComposeRuntime};
