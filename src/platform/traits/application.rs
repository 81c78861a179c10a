// ABOUTME: Application-level operations trait for the control plane.
// ABOUTME: Look up applications, publish versions, and snapshot configuration templates.

use super::shared_types::StorageLocation;
use crate::platform::PlatformError;
use crate::types::{ApplicationName, EnvironmentId, TemplateName, VersionLabel};
use async_trait::async_trait;

/// Operations scoped to an application rather than a single environment.
#[async_trait]
pub trait ApplicationOps: Send + Sync {
    /// Return the subset of `names` that exist.
    async fn list_applications(
        &self,
        names: &[ApplicationName],
    ) -> Result<Vec<ApplicationName>, PlatformError>;

    /// Register an uploaded bundle as an immutable application version.
    async fn publish_version(
        &self,
        application: &ApplicationName,
        label: &VersionLabel,
        description: &str,
        source: &StorageLocation,
    ) -> Result<(), PlatformError>;

    /// Save an environment's configuration as a reusable template.
    async fn create_configuration_template(
        &self,
        application: &ApplicationName,
        environment: &EnvironmentId,
        template: &TemplateName,
    ) -> Result<TemplateName, PlatformError>;
}
