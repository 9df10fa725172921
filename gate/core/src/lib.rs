pub mod config;
pub mod discovery;
pub mod env;
pub mod errors;
pub mod health;
pub mod orchestrator;
pub mod outputs;
pub mod ports;
pub mod readiness;
pub mod runtime;

pub use config::GateConfig;
pub use discovery::{ComposeService, DiscoveryError, discover_services};
pub use env::{EnvEntry, EnvFileError, load_env_file};
pub use errors::GateError;
pub use health::{HealthState, check_health};
pub use orchestrator::RunReport;
pub use outputs::{MemorySink, VariableSink};
pub use ports::{MalformedMapping, PortMapping, parse_port_mapping, variable_name};
pub use readiness::{InspectionError, ReadinessReport, wait_until_ready};
pub use runtime::{ContainerRuntime, RuntimeError};
