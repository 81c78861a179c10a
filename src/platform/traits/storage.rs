// ABOUTME: Blob storage operations trait.
// ABOUTME: Uploads source bundles before they are published as versions.

use super::shared_types::PutObject;
use crate::platform::PlatformError;
use async_trait::async_trait;

/// Blob storage writes.
#[async_trait]
pub trait StorageOps: Send + Sync {
    /// Write an object in a single request.
    async fn put_object(&self, request: PutObject) -> Result<(), PlatformError>;
}
