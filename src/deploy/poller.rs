// ABOUTME: Polls an environment until it converges on the expected version.
// ABOUTME: Converged means Ready status, Green health, and the expected version label.

use tokio::time::Instant;

use crate::platform::{Environment, EnvironmentFilter, EnvironmentOps, EnvironmentStatus};
use crate::types::{ApplicationName, EnvironmentName, VersionLabel};

use super::DeployError;
use super::progress::Progress;
use super::request::Wait;

/// Why a snapshot is not converged yet.
fn pending_reason(
    snapshot: Option<&Environment>,
    environment: &EnvironmentName,
    expected: &VersionLabel,
) -> Option<String> {
    let Some(env) = snapshot else {
        return Some(format!("{expected} still not deployed to {environment}"));
    };

    if env.is_converged_on(expected) {
        return None;
    }
    if env.version_label.as_ref() != Some(expected) || env.status != EnvironmentStatus::Ready {
        return Some(format!("Environment {} status: {}", env.name, env.status));
    }
    Some(format!("Environment {} health: {}", env.name, env.health))
}

/// Wait until `environment` is Ready and Green on `expected`.
///
/// The first describe is issued immediately; later ones follow `wait.interval`
/// apart. Once `wait.timeout` has elapsed since the call no further describe
/// is sent and a timeout error is returned. A failing describe aborts.
pub async fn await_ready<P: EnvironmentOps + ?Sized>(
    platform: &P,
    application: &ApplicationName,
    environment: &EnvironmentName,
    expected: &VersionLabel,
    wait: Wait,
    progress: &dyn Progress,
) -> Result<Environment, DeployError> {
    let filter = EnvironmentFilter::Named(environment.clone());
    let started = Instant::now();

    progress.pending(&format!(
        "Waiting for {environment} to become ready (timing out in {}s)",
        wait.timeout.as_secs()
    ));

    loop {
        if started.elapsed() >= wait.timeout {
            return Err(DeployError::timeout(
                environment.to_string(),
                format!("become Ready and Green on {expected}"),
                wait.timeout,
            ));
        }

        let snapshot = platform
            .list_environments(application, &filter)
            .await?
            .into_iter()
            .next();

        match pending_reason(snapshot.as_ref(), environment, expected) {
            None => {
                tracing::info!(%environment, %expected, "environment is Ready and Green");
                // pending_reason returns None only for Some(snapshot).
                if let Some(env) = snapshot {
                    return Ok(env);
                }
            }
            Some(reason) => progress.pending(&reason),
        }

        tokio::time::sleep(wait.interval).await;
    }
}
