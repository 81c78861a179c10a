// ABOUTME: Blue-green building blocks: template snapshot, parallel environment, hostname swap.
// ABOUTME: Each call is a single write and is never retried.

use crate::diagnostics::Warning;
use crate::platform::{ApplicationOps, Environment, EnvironmentOps};
use crate::types::{
    ApplicationName, EnvironmentName, MAX_ENVIRONMENT_NAME_LEN, TemplateName, VersionLabel,
    generate_environment_name,
};

use super::DeployError;
use super::progress::Progress;

/// Name for the configuration template snapshotted from the old environment.
pub fn template_name(application: &ApplicationName, timestamp_millis: i64) -> TemplateName {
    TemplateName::new(format!("{application}-{timestamp_millis}"))
}

/// Snapshot `source`'s configuration as a reusable template.
pub async fn create_template<P: ApplicationOps + ?Sized>(
    platform: &P,
    application: &ApplicationName,
    source: &Environment,
    timestamp_millis: i64,
) -> Result<TemplateName, DeployError> {
    let template = template_name(application, timestamp_millis);
    tracing::info!(%application, source = %source.name, %template, "creating configuration template");

    let created = platform
        .create_configuration_template(application, &source.id, &template)
        .await?;
    Ok(created)
}

/// Launch a parallel environment running `label` from `template`.
///
/// The name is derived from the application name and `timestamp_millis`;
/// naming notices are reported through `progress`.
pub async fn create_environment<P: EnvironmentOps + ?Sized>(
    platform: &P,
    application: &ApplicationName,
    label: &VersionLabel,
    template: &TemplateName,
    timestamp_millis: i64,
    progress: &dyn Progress,
) -> Result<Environment, DeployError> {
    let generated = generate_environment_name(application, timestamp_millis);

    if generated.stripped_invalid_chars {
        progress.warning(&Warning::name_sanitized(format!(
            "application name \"{application}\" contains characters not allowed in environment names, using \"{}\"",
            generated.name
        )));
    }
    if generated.low_uniqueness {
        progress.warning(&Warning::low_name_uniqueness(format!(
            "application name \"{application}\" is long, environment names are limited to {MAX_ENVIRONMENT_NAME_LEN} characters and may not be unique"
        )));
    }

    tracing::info!(environment = %generated.name, %label, %template, "creating environment");
    let environment = platform
        .create_environment(application, &generated.name, label, template)
        .await?;
    Ok(environment)
}

/// Exchange hostnames so `destination` takes over `source`'s public name.
pub async fn swap_hostnames<P: EnvironmentOps + ?Sized>(
    platform: &P,
    source: &EnvironmentName,
    destination: &EnvironmentName,
) -> Result<(), DeployError> {
    tracing::info!(%source, %destination, "swapping environment hostnames");
    platform.swap_hostnames(source, destination).await?;
    Ok(())
}
