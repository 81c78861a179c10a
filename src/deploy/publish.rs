// ABOUTME: Source bundle upload and application version publication.
// ABOUTME: Both are single irreversible writes; failures abort the session.

use std::path::Path;

use crate::platform::{ApplicationOps, PutObject, StorageLocation, StorageOps};
use crate::types::{ApplicationName, VersionLabel};

use super::DeployError;

/// Read the bundle from disk and write it to `location`.
pub async fn upload_bundle<P: StorageOps + ?Sized>(
    platform: &P,
    bundle: &Path,
    location: &StorageLocation,
) -> Result<(), DeployError> {
    let body = tokio::fs::read(bundle)
        .await
        .map_err(|source| DeployError::BundleUnreadable {
            path: bundle.to_path_buf(),
            source,
        })?;

    tracing::info!(
        bundle = %bundle.display(),
        %location,
        bytes = body.len(),
        "uploading source bundle"
    );

    platform
        .put_object(PutObject {
            location: location.clone(),
            body,
        })
        .await?;
    Ok(())
}

/// Register the uploaded bundle as version `label`.
pub async fn publish_version<P: ApplicationOps + ?Sized>(
    platform: &P,
    application: &ApplicationName,
    label: &VersionLabel,
    description: &str,
    location: &StorageLocation,
) -> Result<(), DeployError> {
    tracing::info!(%application, %label, "creating application version");
    platform
        .publish_version(application, label, description, location)
        .await?;
    Ok(())
}
