// ABOUTME: HTTP health page verification with status and body matching.
// ABOUTME: Retries on mismatch until the page is healthy or the wait times out.

use async_trait::async_trait;
use regex::Regex;
use snafu::ResultExt;
use std::time::Duration;
use tokio::time::Instant;

use crate::config::Scheme;
use crate::platform::{HttpClientSnafu, HttpSnafu, PlatformError};

use super::DeployError;
use super::progress::Progress;

/// Upper bound for a single probe request.
const PROBE_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How the health page body is compared once the status is 200.
#[derive(Debug, Clone)]
pub enum BodyMatcher {
    /// Body must equal this string exactly.
    Literal(String),
    /// Body must contain a match for this pattern.
    Pattern(Regex),
}

impl BodyMatcher {
    pub fn matches(&self, body: &str) -> bool {
        match self {
            BodyMatcher::Literal(expected) => body == expected,
            BodyMatcher::Pattern(pattern) => pattern.is_match(body),
        }
    }
}

impl std::fmt::Display for BodyMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BodyMatcher::Literal(expected) => write!(f, "{expected:?}"),
            BodyMatcher::Pattern(pattern) => write!(f, "/{}/", pattern.as_str()),
        }
    }
}

/// A validated health check.
#[derive(Debug, Clone)]
pub struct HealthCheck {
    /// Always starts with `/`.
    pub path: String,
    pub scheme: Scheme,
    pub expect: Option<BodyMatcher>,
    pub interval: Duration,
    pub timeout: Duration,
}

impl HealthCheck {
    pub fn url(&self, hostname: &str) -> String {
        format!("{}://{}{}", self.scheme, hostname, self.path)
    }
}

/// Response of one health page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    /// Present only when the body was requested.
    pub body: Option<String>,
}

/// Issues a single GET against a health page.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn get(&self, url: &str, read_body: bool) -> Result<ProbeResponse, PlatformError>;
}

/// reqwest-backed probe.
///
/// For https the client accepts certificates it cannot verify: a freshly
/// created load balancer may not serve a trusted certificate yet. The plain
/// http client is built without that relaxation. Redirects are never
/// followed: a 3xx from the health page is a mismatch like any other non-200.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(scheme: Scheme) -> Result<Self, PlatformError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(scheme == Scheme::Https)
            .redirect(reqwest::redirect::Policy::none())
            .timeout(PROBE_REQUEST_TIMEOUT)
            .build()
            .context(HttpClientSnafu)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HealthProbe for HttpProbe {
    async fn get(&self, url: &str, read_body: bool) -> Result<ProbeResponse, PlatformError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .context(HttpSnafu { url })?;

        let status = response.status().as_u16();
        let body = if read_body && status == 200 {
            Some(response.text().await.context(HttpSnafu { url })?)
        } else {
            None
        };

        Ok(ProbeResponse { status, body })
    }
}

/// Outcome of a single probe attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Attempt {
    Healthy,
    Unhealthy(String),
}

async fn probe_once<H: HealthProbe + ?Sized>(probe: &H, url: &str, check: &HealthCheck) -> Attempt {
    let response = match probe.get(url, check.expect.is_some()).await {
        Ok(response) => response,
        // New hostnames may not resolve or accept connections yet.
        Err(e) => return Attempt::Unhealthy(e.to_string()),
    };

    if response.status != 200 {
        return Attempt::Unhealthy(format!("status {}", response.status));
    }

    let Some(matcher) = &check.expect else {
        return Attempt::Healthy;
    };

    let body = response.body.unwrap_or_default();
    if matcher.matches(&body) {
        Attempt::Healthy
    } else {
        Attempt::Unhealthy(format!("expected body {matcher}, got {body:?}"))
    }
}

/// Wait until the health page on `hostname` answers 200 with the expected body.
///
/// Skips entirely (no request) when `check` is `None`. The timeout is
/// measured from the call; once it has passed no further request is sent.
pub async fn await_healthy<H: HealthProbe + ?Sized>(
    probe: &H,
    hostname: &str,
    check: Option<&HealthCheck>,
    progress: &dyn Progress,
) -> Result<(), DeployError> {
    let Some(check) = check else {
        tracing::debug!(hostname, "no health page configured, skipping check");
        return Ok(());
    };

    let url = check.url(hostname);
    let started = Instant::now();
    progress.pending(&format!(
        "Checking health page {url} (timing out in {}s)",
        check.timeout.as_secs()
    ));

    loop {
        if started.elapsed() >= check.timeout {
            return Err(DeployError::timeout(
                url,
                "return a healthy response",
                check.timeout,
            ));
        }

        match probe_once(probe, &url, check).await {
            Attempt::Healthy => {
                tracing::info!(%url, "health page is healthy");
                return Ok(());
            }
            Attempt::Unhealthy(reason) => {
                progress.pending(&format!("Health page {url}: {reason}"));
            }
        }

        tokio::time::sleep(check.interval).await;
    }
}
