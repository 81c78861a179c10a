// ABOUTME: Environment log retrieval trait.
// ABOUTME: Request tail logs and fetch the resulting per-instance download links.

use super::shared_types::EnvironmentInfo;
use crate::platform::PlatformError;
use crate::types::EnvironmentName;
use async_trait::async_trait;

/// Log bundle operations.
#[async_trait]
pub trait EnvironmentInfoOps: Send + Sync {
    /// Ask every instance of the environment to publish its tail logs.
    async fn request_environment_info(
        &self,
        environment: &EnvironmentName,
    ) -> Result<(), PlatformError>;

    /// List log bundles published so far.
    async fn retrieve_environment_info(
        &self,
        environment: &EnvironmentName,
    ) -> Result<Vec<EnvironmentInfo>, PlatformError>;
}
