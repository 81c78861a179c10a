// ABOUTME: Deploy command implementation.
// ABOUTME: Validates the request, then runs the deployment state machine against AWS.

use super::platform_connection::connect_to_platform;
use ebdeploy::config::{Config, DeployType, Scheme};
use ebdeploy::deploy::{Deployment, DeploymentOutcome, DeploymentRequest, HttpProbe};
use ebdeploy::diagnostics::Diagnostics;
use ebdeploy::error::Result;
use ebdeploy::output::Output;
use ebdeploy::types::VersionLabel;
use std::path::PathBuf;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct DeployOverrides {
    pub bundle: Option<PathBuf>,
    pub version_label: Option<String>,
    pub description: Option<String>,
    pub deploy_type: Option<DeployType>,
}

impl DeployOverrides {
    fn apply(self, config: &mut Config) {
        if let Some(bundle) = self.bundle {
            config.bundle = Some(bundle);
        }
        if let Some(label) = self.version_label {
            config.version.label = Some(VersionLabel::new(label));
        }
        if let Some(description) = self.description {
            config.version.description = Some(description);
        }
        if let Some(deploy_type) = self.deploy_type {
            config.deploy_type = deploy_type;
        }
    }
}

/// Deploy the configured bundle to the target environment.
pub async fn deploy(mut config: Config, overrides: DeployOverrides, mut output: Output) -> Result<()> {
    overrides.apply(&mut config);

    output.start_timer();
    let mut diag = Diagnostics::default();

    // Everything is validated here, before any network call.
    let request = DeploymentRequest::from_config(&config, &mut diag)?;

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    output.progress(&format!(
        "Deploying {} ({}) to {} [{}]",
        request.application(),
        request.version_label,
        request.selector.target,
        request.deploy_type
    ));

    let platform = connect_to_platform(&request.selector, &config, &output).await?;
    let scheme = request
        .health
        .as_ref()
        .map(|h| h.scheme)
        .unwrap_or(Scheme::Http);
    let probe = HttpProbe::new(scheme)?;

    let label = request.version_label.clone();
    let outcome = Deployment::new(request, &platform, &probe, &output)
        .run()
        .await;

    match outcome {
        DeploymentOutcome::Succeeded { environment } => {
            let message = match environment {
                Some(env) => format!("Deployed {label} to {}", env.name),
                None => format!("Published {label}"),
            };
            output.success(&message);
            Ok(())
        }
        DeploymentOutcome::Failed {
            error,
            phase,
            last_snapshot,
            ..
        } => {
            if let Some(env) = last_snapshot {
                tracing::debug!(
                    environment = %env.name,
                    status = %env.status,
                    health = %env.health,
                    %phase,
                    "last known environment state"
                );
            }
            Err(error.into())
        }
    }
}
