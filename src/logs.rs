// ABOUTME: Tail log retrieval for a running environment.
// ABOUTME: Requests a log bundle, waits for it to be published, and writes one file per instance.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use snafu::ResultExt;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;

use crate::deploy::{DeployError, Progress, Wait};
use crate::error::Result;
use crate::platform::{EnvironmentInfo, EnvironmentInfoOps, HttpClientSnafu, HttpSnafu, PlatformError};
use crate::types::EnvironmentName;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Downloads a published log file.
#[async_trait]
pub trait LogFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, PlatformError>;
}

/// reqwest-backed fetcher for presigned log URLs.
#[derive(Debug, Clone)]
pub struct HttpLogFetcher {
    client: reqwest::Client,
}

impl HttpLogFetcher {
    pub fn new() -> std::result::Result<Self, PlatformError> {
        let client = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .context(HttpClientSnafu)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl LogFetcher for HttpLogFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, PlatformError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .context(HttpSnafu { url })?;
        let body = response.bytes().await.context(HttpSnafu { url })?;
        Ok(body.to_vec())
    }
}

/// Directory name for one log request.
pub fn request_stamp(requested_at: DateTime<Utc>) -> String {
    requested_at.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Identity of one published tail sample.
type SampleKey = (String, DateTime<Utc>);

fn sample_key(info: &EnvironmentInfo) -> SampleKey {
    (info.instance_id.clone(), info.sampled_at)
}

/// Entries that were not already published when `baseline` was taken.
///
/// Compares platform-side samples with each other only, so the local clock
/// plays no part.
fn published_after(entries: Vec<EnvironmentInfo>, baseline: &HashSet<SampleKey>) -> Vec<EnvironmentInfo> {
    entries
        .into_iter()
        .filter(|info| !baseline.contains(&sample_key(info)))
        .collect()
}

/// Request tail logs for `environment` and write them under `output_dir`.
///
/// Each poll waits `wait.interval` first. `wait.timeout` bounds the whole
/// retrieval, downloads included. Returns the written files, one per
/// instance, under `<output_dir>/<request-stamp>/`.
pub async fn retrieve_logs<P, F>(
    platform: &P,
    fetcher: &F,
    environment: &EnvironmentName,
    output_dir: &Path,
    wait: Wait,
    progress: &dyn Progress,
) -> Result<Vec<PathBuf>>
where
    P: EnvironmentInfoOps + ?Sized,
    F: LogFetcher + ?Sized,
{
    let started = Instant::now();
    let deadline = started + wait.timeout;

    let baseline: HashSet<SampleKey> = platform
        .retrieve_environment_info(environment)
        .await?
        .iter()
        .map(sample_key)
        .collect();

    let requested_at = Utc::now();
    tracing::info!(%environment, stale = baseline.len(), "requesting tail logs");
    platform.request_environment_info(environment).await?;

    let entries = loop {
        tokio::time::sleep(wait.interval).await;

        if started.elapsed() >= wait.timeout {
            return Err(DeployError::timeout(
                environment.to_string(),
                "publish tail logs",
                wait.timeout,
            )
            .into());
        }

        let found = published_after(
            platform.retrieve_environment_info(environment).await?,
            &baseline,
        );
        if !found.is_empty() {
            break found;
        }
        progress.pending("Still waiting for logs...");
    };

    let dir = output_dir.join(request_stamp(requested_at));
    match tokio::time::timeout_at(deadline, download_all(fetcher, entries, &dir, progress)).await {
        Ok(written) => written,
        Err(_) => Err(DeployError::timeout(
            environment.to_string(),
            "download tail logs",
            wait.timeout,
        )
        .into()),
    }
}

async fn download_all<F: LogFetcher + ?Sized>(
    fetcher: &F,
    entries: Vec<EnvironmentInfo>,
    dir: &Path,
    progress: &dyn Progress,
) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir).await?;

    let mut written = Vec::with_capacity(entries.len());
    for info in entries {
        let body = fetcher.fetch(&info.url).await?;
        let path = dir.join(format!("{}.log", info.instance_id));
        progress.pending(&format!(
            "Writing log file for instance {} to {}",
            info.instance_id,
            path.display()
        ));
        tokio::fs::write(&path, body).await?;
        written.push(path);
    }

    Ok(written)
}
