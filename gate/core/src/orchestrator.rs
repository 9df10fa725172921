use tracing::{debug, info, warn};

use crate::{
    config::GateConfig,
    discovery::{ComposeService, discover_services},
    env::{EnvEntry, load_env_file},
    errors::GateError,
    outputs::VariableSink,
    ports::{parse_port_mapping, variable_name},
    readiness::wait_until_ready,
    runtime::ContainerRuntime,
};

/// Summary of a successful gate run.
#[derive(Debug)]
pub struct RunReport {
    pub services: Vec<ComposeService>,
    pub tries_used: u32,
    pub published: usize,
}

/// Drive the whole sequence: start, discover, gate, collect ports, publish.
///
/// Every step short-circuits the run on failure except the compose up call
/// itself, whose status is deliberately ignored (see below).
pub async fn run<R, S>(
    config: &GateConfig,
    runtime: &R,
    sink: &mut S,
) -> Result<RunReport, GateError>
where
    R: ContainerRuntime + ?Sized,
    S: VariableSink + ?Sized,
{
    config.validate()?;

    if !config.compose_file.exists() {
        return Err(GateError::MissingComposeFile {
            path: config.compose_file.clone(),
        });
    }

    let env = load_configured_env(config)?;

    info!(
        project = %config.project_name,
        compose_file = %config.compose_file.display(),
        "starting compose stack"
    );
    if let Err(err) = runtime
        .up(&config.compose_file, &config.project_name, &env)
        .await
    {
        // Compose writes progress to its diagnostic stream and its exit
        // status is not a reliable success signal here. Discovery and the
        // health gate below decide the outcome.
        warn!(error = %err, "compose up reported failure; deferring to discovery and health checks");
    }

    let services = discover_services(runtime, &config.project_name).await?;
    info!(services = services.len(), "discovered compose services");

    let report = wait_until_ready(
        runtime,
        &services,
        config.poll_interval,
        config.max_tries,
    )
    .await?;
    if !report.all_healthy {
        return Err(GateError::ReadinessTimeout {
            tries: report.tries_used,
        });
    }

    let published = publish_ports(config, runtime, &services, sink).await?;

    info!(
        published,
        tries_used = report.tries_used,
        "compose stack ready"
    );
    Ok(RunReport {
        services,
        tries_used: report.tries_used,
        published,
    })
}

fn load_configured_env(config: &GateConfig) -> Result<Vec<EnvEntry>, GateError> {
    match &config.env_file {
        Some(path) => {
            if !path.exists() {
                return Err(GateError::MissingEnvFile { path: path.clone() });
            }
            Ok(load_env_file(path)?)
        }
        None => Ok(Vec::new()),
    }
}

async fn publish_ports<R, S>(
    config: &GateConfig,
    runtime: &R,
    services: &[ComposeService],
    sink: &mut S,
) -> Result<usize, GateError>
where
    R: ContainerRuntime + ?Sized,
    S: VariableSink + ?Sized,
{
    let mut published = 0;
    for service in services {
        let raw = runtime
            .port_mappings_for(&service.container_id)
            .await
            .map_err(|source| GateError::PortFetch {
                service: service.service_name.clone(),
                container: service.container_id.clone(),
                source,
            })?;

        if raw.trim().is_empty() {
            debug!(service = %service.service_name, "service exposes no ports; skipping");
            continue;
        }

        for line in raw.lines().filter(|line| !line.trim().is_empty()) {
            let mapping =
                parse_port_mapping(line).map_err(|source| GateError::MalformedMapping {
                    service: service.service_name.clone(),
                    source,
                })?;

            let name = variable_name(
                &config.project_name,
                &service.service_name,
                mapping.container_port,
            );
            info!(name = %name, host_port = mapping.host_port, "publishing port mapping");
            sink.publish(&name, &mapping.host_port.to_string());
            published += 1;
        }
    }
    Ok(published)
}
