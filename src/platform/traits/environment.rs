// ABOUTME: Environment operations trait for the control plane.
// ABOUTME: Describe, update, create environments and swap their hostnames.

use super::shared_types::{Environment, EnvironmentFilter};
use crate::platform::PlatformError;
use crate::types::{ApplicationName, EnvironmentName, TemplateName, VersionLabel};
use async_trait::async_trait;

/// Environment lifecycle operations.
///
/// Reads are idempotent. Every mutating method is called at most once per
/// deployment session.
#[async_trait]
pub trait EnvironmentOps: Send + Sync {
    /// Describe the non-deleted environments of `application` matching `filter`.
    async fn list_environments(
        &self,
        application: &ApplicationName,
        filter: &EnvironmentFilter,
    ) -> Result<Vec<Environment>, PlatformError>;

    /// Point an existing environment at a new version.
    async fn update_environment(
        &self,
        environment: &EnvironmentName,
        label: &VersionLabel,
        description: &str,
    ) -> Result<(), PlatformError>;

    /// Launch a new environment from a configuration template.
    async fn create_environment(
        &self,
        application: &ApplicationName,
        environment: &EnvironmentName,
        label: &VersionLabel,
        template: &TemplateName,
    ) -> Result<Environment, PlatformError>;

    /// Exchange the public hostnames of two environments.
    async fn swap_hostnames(
        &self,
        source: &EnvironmentName,
        destination: &EnvironmentName,
    ) -> Result<(), PlatformError>;
}
