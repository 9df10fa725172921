use std::{error::Error as _, path::PathBuf, process::ExitCode, time::Duration};

use clap::Parser;
use compose_gate_core::{GateConfig, GateError, orchestrator};
use compose_gate_runner_docker::{DockerComposeRuntime, ensure_docker_available};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod sinks;

use sinks::OutputFormat;

/// Exit code when the docker daemon cannot be reached at all.
const DOCKER_UNAVAILABLE_EXIT: u8 = 30;

#[derive(Debug, Parser)]
#[command(
    name = "compose-gate",
    about = "Start a compose stack, wait until every service is healthy, publish host ports",
    version
)]
struct Cli {
    /// Compose file describing the service topology.
    #[arg(long, default_value = "docker-compose.yml")]
    compose_file: PathBuf,

    /// Compose project name used to label and discover containers.
    #[arg(long)]
    project_name: String,

    /// Optional KEY=VALUE env file passed to the compose up call.
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Seconds to sleep between health-poll rounds.
    #[arg(long, default_value_t = 2)]
    interval_secs: u64,

    /// Maximum number of health-poll rounds before giving up.
    #[arg(long, default_value_t = 30)]
    max_tries: u32,

    /// Output format for published port variables.
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    output_format: OutputFormat,
}

impl Cli {
    fn into_config(self) -> (GateConfig, OutputFormat) {
        let mut config = GateConfig::new(self.project_name)
            .with_compose_file(self.compose_file)
            .with_poll_interval(Duration::from_secs(self.interval_secs))
            .with_max_tries(self.max_tries);
        if let Some(env_file) = self.env_file {
            config = config.with_env_file(env_file);
        }
        (config, self.output_format)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let (config, output_format) = Cli::parse().into_config();

    if let Err(err) = ensure_docker_available().await {
        error!("{err}");
        return ExitCode::from(DOCKER_UNAVAILABLE_EXIT);
    }

    let runtime = DockerComposeRuntime::new();
    let mut sink = sinks::sink_for(output_format);

    match orchestrator::run(&config, &runtime, sink.as_mut()).await {
        Ok(report) => {
            info!(
                services = report.services.len(),
                published = report.published,
                tries_used = report.tries_used,
                "gate passed"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_failure(&err);
            ExitCode::from(err.exit_code())
        }
    }
}

fn report_failure(err: &GateError) {
    error!("{err}");
    let mut source = err.source();
    while let Some(cause) = source {
        error!("caused by: {cause}");
        source = cause.source();
    }
}
