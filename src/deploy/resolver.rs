// ABOUTME: Resolves the target environment by name or public hostname.
// ABOUTME: Verifies the application exists before looking at its environments.

use crate::config::DeployType;
use crate::platform::{ApplicationOps, Environment, EnvironmentFilter, EnvironmentOps};
use crate::types::ApplicationName;

use super::DeployError;
use super::request::TargetRef;

/// Fail unless `application` exists.
pub async fn ensure_application<P: ApplicationOps + ?Sized>(
    platform: &P,
    application: &ApplicationName,
) -> Result<(), DeployError> {
    let found = platform
        .list_applications(std::slice::from_ref(application))
        .await?;

    if found.is_empty() {
        return Err(DeployError::ApplicationNotFound(application.to_string()));
    }
    Ok(())
}

/// Find the first non-deleted environment of `application` matching `target`.
pub async fn find_environment<P: EnvironmentOps + ?Sized>(
    platform: &P,
    application: &ApplicationName,
    target: &TargetRef,
) -> Result<Option<Environment>, DeployError> {
    let environments = platform
        .list_environments(application, &EnvironmentFilter::All)
        .await?;

    Ok(environments.into_iter().find(|env| match target {
        TargetRef::Name(name) => &env.name == name,
        TargetRef::Hostname(hostname) => env.hostname.as_deref() == Some(hostname.as_str()),
    }))
}

/// Check the application, then find the target environment, which must exist.
pub async fn require_environment<P: ApplicationOps + EnvironmentOps + ?Sized>(
    platform: &P,
    application: &ApplicationName,
    target: &TargetRef,
) -> Result<Environment, DeployError> {
    ensure_application(platform, application).await?;

    find_environment(platform, application, target)
        .await?
        .ok_or_else(|| DeployError::EnvironmentNotFound(target.to_string()))
}

/// Check the application, then resolve the target environment.
///
/// A missing environment is an error unless `deploy_type` tolerates it, in
/// which case `Ok(None)` is returned.
pub async fn resolve<P: ApplicationOps + EnvironmentOps + ?Sized>(
    platform: &P,
    application: &ApplicationName,
    target: &TargetRef,
    deploy_type: DeployType,
) -> Result<Option<Environment>, DeployError> {
    if deploy_type.requires_environment() {
        return require_environment(platform, application, target)
            .await
            .map(Some);
    }

    ensure_application(platform, application).await?;
    find_environment(platform, application, target).await
}
