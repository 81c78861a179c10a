// ABOUTME: Control loop that executes state machine actions against the platform.
// ABOUTME: Owns the request and reports every phase change to a Progress observer.

use crate::diagnostics::Warning;
use crate::platform::Platform;

use super::health::{HealthProbe, await_healthy};
use super::outcome::DeploymentOutcome;
use super::progress::Progress;
use super::request::DeploymentRequest;
use super::state::{Action, Event, Phase, State};
use super::transitions::advance;
use super::{DeployError, poller, publish, resolver, swap};

/// A validated deployment ready to run.
///
/// The platform client and health probe are injected so the same driver
/// runs against AWS or an in-memory fake.
pub struct Deployment<'a, P: ?Sized, H: ?Sized> {
    request: DeploymentRequest,
    platform: &'a P,
    probe: &'a H,
    progress: &'a dyn Progress,
}

impl<'a, P, H> Deployment<'a, P, H>
where
    P: Platform + ?Sized,
    H: HealthProbe + ?Sized,
{
    pub fn new(
        request: DeploymentRequest,
        platform: &'a P,
        probe: &'a H,
        progress: &'a dyn Progress,
    ) -> Self {
        Self {
            request,
            platform,
            probe,
            progress,
        }
    }

    pub fn request(&self) -> &DeploymentRequest {
        &self.request
    }

    /// Run the session to completion.
    ///
    /// Never returns early on error: every failure is folded into the
    /// returned outcome.
    pub async fn run(self) -> DeploymentOutcome {
        let mut state = State::Validating;
        let mut event = Event::Start;

        loop {
            let (next, action) = advance(&self.request, state, event);
            state = next;
            tracing::debug!(phase = %state.phase(), ?action, "state transition");

            if let Action::Finish(outcome) = action {
                self.report_finish(&outcome);
                return outcome;
            }

            self.progress
                .phase(state.phase(), &describe(&action, &self.request));

            event = match self.perform(action).await {
                Ok(event) => event,
                Err(error) => Event::Failed(error),
            };
        }
    }

    async fn perform(&self, action: Action) -> Result<Event, DeployError> {
        let request = &self.request;
        let application = request.application();

        match action {
            Action::Resolve => {
                let environment = resolver::resolve(
                    self.platform,
                    application,
                    &request.selector.target,
                    request.deploy_type,
                )
                .await?;

                if environment.is_none() {
                    self.progress.warning(&Warning::environment_absent(format!(
                        "environment \"{}\" does not exist, only the version will be published",
                        request.selector.target
                    )));
                }
                Ok(Event::Resolved(environment))
            }

            Action::Upload => {
                publish::upload_bundle(self.platform, &request.bundle, &request.storage).await?;
                Ok(Event::Uploaded)
            }

            Action::Publish => {
                publish::publish_version(
                    self.platform,
                    application,
                    &request.version_label,
                    &request.description,
                    &request.storage,
                )
                .await?;
                Ok(Event::Published)
            }

            Action::UpdateEnvironment(environment) => {
                tracing::info!(%environment, label = %request.version_label, "updating environment");
                self.platform
                    .update_environment(&environment, &request.version_label, &request.description)
                    .await?;
                Ok(Event::Updated)
            }

            Action::CreateEnvironment { from } => {
                let now = chrono::Utc::now().timestamp_millis();
                let template = swap::create_template(self.platform, application, &from, now).await?;
                let created = swap::create_environment(
                    self.platform,
                    application,
                    &request.version_label,
                    &template,
                    now,
                    self.progress,
                )
                .await?;
                Ok(Event::Created(created))
            }

            Action::AwaitReady(environment) => {
                let snapshot = poller::await_ready(
                    self.platform,
                    application,
                    &environment,
                    &request.version_label,
                    request.convergence,
                    self.progress,
                )
                .await?;
                Ok(Event::Converged(snapshot))
            }

            Action::VerifyHealth { hostname } => {
                await_healthy(
                    self.probe,
                    hostname.as_deref().unwrap_or_default(),
                    request.health.as_ref(),
                    self.progress,
                )
                .await?;
                Ok(Event::Healthy)
            }

            Action::Swap {
                source,
                destination,
            } => {
                swap::swap_hostnames(self.platform, &source, &destination).await?;
                Ok(Event::Swapped)
            }

            Action::Finish(_) => Err(DeployError::UnexpectedEvent {
                phase: Phase::Succeeded,
                event: "finish",
            }),
        }
    }

    fn report_finish(&self, outcome: &DeploymentOutcome) {
        match outcome {
            DeploymentOutcome::Succeeded { environment } => {
                let target = environment
                    .as_ref()
                    .map(|e| e.name.to_string())
                    .unwrap_or_else(|| self.request.selector.target.to_string());
                tracing::info!(%target, label = %self.request.version_label, "deployment succeeded");
                self.progress.phase(
                    Phase::Succeeded,
                    &format!("Deployed {} to {target}", self.request.version_label),
                );
            }
            DeploymentOutcome::Failed {
                kind, error, phase, ..
            } => {
                tracing::warn!(?kind, %phase, %error, "deployment failed");
                self.progress.phase(
                    Phase::Failed,
                    &format!("Deployment failed while {phase}: {error}"),
                );
            }
        }
    }
}

/// Operator-facing line for the action about to run.
fn describe(action: &Action, request: &DeploymentRequest) -> String {
    match action {
        Action::Resolve => format!(
            "Resolving {} in application {}",
            request.selector.target,
            request.application()
        ),
        Action::Upload => format!(
            "Uploading {} to {}",
            request.bundle.display(),
            request.storage
        ),
        Action::Publish => format!("Creating application version {}", request.version_label),
        Action::UpdateEnvironment(environment) => {
            format!("Updating {environment} to {}", request.version_label)
        }
        Action::CreateEnvironment { from } => {
            format!("Creating a new environment from {}", from.name)
        }
        Action::AwaitReady(environment) => format!("Waiting for {environment} to converge"),
        Action::VerifyHealth { hostname: Some(hostname) } => {
            format!("Verifying health of {hostname}")
        }
        Action::VerifyHealth { hostname: None } => "Skipping health verification".to_string(),
        Action::Swap {
            source,
            destination,
        } => format!("Swapping hostnames of {source} and {destination}"),
        Action::Finish(_) => String::new(),
    }
}
