// ABOUTME: Test support utilities.
// ABOUTME: In-memory control plane, health probes, and a recording progress observer.

// Each test binary only uses some of these helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ebdeploy::config::{Config, DeployType};
use ebdeploy::deploy::{HealthProbe, Phase, ProbeResponse, Progress};
use ebdeploy::diagnostics::Warning;
use ebdeploy::platform::{
    ApplicationOps, Environment, EnvironmentFilter, EnvironmentHealth, EnvironmentInfo,
    EnvironmentInfoOps, EnvironmentOps, EnvironmentStatus, PlatformError, PutObject,
    StorageLocation, StorageOps,
};
use ebdeploy::types::{
    ApplicationName, EnvironmentId, EnvironmentName, TemplateName, VersionLabel,
};
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("ebdeploy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Write a small source bundle into a fresh temporary directory.
pub fn bundle(file_name: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(file_name);
    std::fs::write(&path, b"PK\x03\x04 fake bundle").unwrap();
    (dir, path)
}

/// Config for application `app` targeting `environment` with label `label`
/// and a `/health` page expected to return the label.
pub fn config(bundle: &Path, environment: &str, label: &str, deploy_type: DeployType) -> Config {
    let mut config = Config::template();
    config.application = Some(ApplicationName::new("app"));
    config.environment = Some(EnvironmentName::new(environment));
    config.region = Some("us-east-1".to_string());
    config.bundle = Some(bundle.to_path_buf());
    config.deploy_type = deploy_type;
    config.version.label = Some(VersionLabel::new(label));
    config.health.path = Some("health".to_string());
    config.health.expect = Some(ebdeploy::config::ExpectedBody::Literal(label.to_string()));
    config.health.interval = Duration::from_secs(10);
    config.health.timeout = Duration::from_secs(60);
    config.convergence.interval = Duration::from_secs(20);
    config.convergence.timeout = Duration::from_secs(600);
    config
}

/// One control-plane call as observed by [`FakePlatform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListApplications,
    ListEnvironments(Option<String>),
    PutObject { bucket: String, key: String },
    PublishVersion(String),
    UpdateEnvironment { environment: String, label: String },
    CreateTemplate { source: String, template: String },
    CreateEnvironment { environment: String, label: String, template: String },
    SwapHostnames { source: String, destination: String },
    RequestEnvironmentInfo(String),
    RetrieveEnvironmentInfo(String),
}

impl Call {
    pub fn is_write(&self) -> bool {
        !matches!(
            self,
            Call::ListApplications
                | Call::ListEnvironments(_)
                | Call::RetrieveEnvironmentInfo(_)
        )
    }
}

#[derive(Debug, Clone)]
struct FakeEnvironment {
    snapshot: Environment,
    /// Named describes left before an update or launch settles.
    pending_polls: usize,
}

#[derive(Debug, Default)]
struct FakeState {
    applications: Vec<ApplicationName>,
    environments: Vec<FakeEnvironment>,
    calls: Vec<Call>,
    uploads: Vec<PutObject>,
    failing: HashSet<&'static str>,
    settle_polls: usize,
    log_instances: Vec<String>,
    log_polls_before_ready: usize,
    log_requested: bool,
    log_clock_offset: Option<chrono::Duration>,
    published_logs: Vec<EnvironmentInfo>,
}

/// In-memory control plane.
///
/// Updated or launched environments report `Updating`/`Launching` for
/// `settle_polls` named describes, then `Ready` and `Green`.
#[derive(Debug, Default)]
pub struct FakePlatform {
    state: Mutex<FakeState>,
}

impl FakePlatform {
    pub fn new(application: &str) -> Self {
        let platform = Self::default();
        platform
            .state
            .lock()
            .applications
            .push(ApplicationName::new(application));
        platform
    }

    pub fn with_environment(self, name: &str, hostname: &str, label: &str) -> Self {
        self.state.lock().environments.push(FakeEnvironment {
            snapshot: environment(name, Some(hostname), label),
            pending_polls: 0,
        });
        self
    }

    pub fn settle_after(self, polls: usize) -> Self {
        self.state.lock().settle_polls = polls;
        self
    }

    /// Updates and launches never settle.
    pub fn never_settle(self) -> Self {
        self.settle_after(usize::MAX)
    }

    /// Make the named operation fail, e.g. `"UpdateEnvironment"`.
    pub fn failing(self, operation: &'static str) -> Self {
        self.state.lock().failing.insert(operation);
        self
    }

    /// After a tail request, publish one entry per instance once
    /// `polls_before_ready` retrieves have come back without it.
    pub fn with_logs(self, instances: &[&str], polls_before_ready: usize) -> Self {
        {
            let mut state = self.state.lock();
            state.log_instances = instances.iter().map(|i| i.to_string()).collect();
            state.log_polls_before_ready = polls_before_ready;
        }
        self
    }

    /// Entries left over from an earlier tail request.
    pub fn with_stale_logs(self, instances: &[&str], sampled_at: DateTime<Utc>) -> Self {
        self.state
            .lock()
            .published_logs
            .extend(instances.iter().map(|instance| EnvironmentInfo {
                instance_id: instance.to_string(),
                sampled_at,
                url: format!("https://logs.example.com/stale/{instance}"),
            }));
        self
    }

    /// Platform clock skew applied to newly published samples.
    pub fn with_log_clock_offset(self, offset: chrono::Duration) -> Self {
        self.state.lock().log_clock_offset = Some(offset);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| predicate(*c)).count()
    }

    pub fn uploads(&self) -> Vec<PutObject> {
        self.state.lock().uploads.clone()
    }

    pub fn environment(&self, name: &str) -> Option<Environment> {
        self.state
            .lock()
            .environments
            .iter()
            .find(|e| e.snapshot.name.as_str() == name)
            .map(|e| e.snapshot.clone())
    }

    pub fn environments(&self) -> Vec<Environment> {
        self.state
            .lock()
            .environments
            .iter()
            .map(|e| e.snapshot.clone())
            .collect()
    }

    /// Version served on `hostname`, if any environment is bound to it.
    pub fn served_on(&self, hostname: &str) -> Option<String> {
        self.state
            .lock()
            .environments
            .iter()
            .find(|e| e.snapshot.hostname.as_deref() == Some(hostname))
            .filter(|e| e.snapshot.status == EnvironmentStatus::Ready)
            .and_then(|e| e.snapshot.version_label.as_ref().map(|l| l.to_string()))
    }

    fn record(&self, operation: &'static str, call: Call) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        state.calls.push(call);
        if state.failing.contains(operation) {
            return Err(PlatformError::request(operation, "injected failure"));
        }
        Ok(())
    }
}

pub fn environment(name: &str, hostname: Option<&str>, label: &str) -> Environment {
    Environment {
        id: EnvironmentId::new(format!("e-{name}")),
        name: EnvironmentName::new(name),
        hostname: hostname.map(str::to_string),
        status: EnvironmentStatus::Ready,
        health: EnvironmentHealth::Green,
        version_label: Some(VersionLabel::new(label)),
    }
}

#[async_trait]
impl ApplicationOps for FakePlatform {
    async fn list_applications(
        &self,
        names: &[ApplicationName],
    ) -> Result<Vec<ApplicationName>, PlatformError> {
        self.record("DescribeApplications", Call::ListApplications)?;
        let state = self.state.lock();
        Ok(state
            .applications
            .iter()
            .filter(|a| names.contains(a))
            .cloned()
            .collect())
    }

    async fn publish_version(
        &self,
        _application: &ApplicationName,
        label: &VersionLabel,
        _description: &str,
        _source: &StorageLocation,
    ) -> Result<(), PlatformError> {
        self.record(
            "CreateApplicationVersion",
            Call::PublishVersion(label.to_string()),
        )
    }

    async fn create_configuration_template(
        &self,
        _application: &ApplicationName,
        source: &EnvironmentId,
        template: &TemplateName,
    ) -> Result<TemplateName, PlatformError> {
        self.record(
            "CreateConfigurationTemplate",
            Call::CreateTemplate {
                source: source.to_string(),
                template: template.to_string(),
            },
        )?;
        Ok(template.clone())
    }
}

#[async_trait]
impl EnvironmentOps for FakePlatform {
    async fn list_environments(
        &self,
        _application: &ApplicationName,
        filter: &EnvironmentFilter,
    ) -> Result<Vec<Environment>, PlatformError> {
        let named = match filter {
            EnvironmentFilter::All => None,
            EnvironmentFilter::Named(name) => Some(name.to_string()),
        };
        self.record("DescribeEnvironments", Call::ListEnvironments(named.clone()))?;

        let mut state = self.state.lock();
        let Some(name) = named else {
            return Ok(state
                .environments
                .iter()
                .map(|e| e.snapshot.clone())
                .collect());
        };

        let Some(env) = state
            .environments
            .iter_mut()
            .find(|e| e.snapshot.name.as_str() == name)
        else {
            return Ok(Vec::new());
        };

        if env.pending_polls > 0 {
            env.pending_polls -= 1;
            return Ok(vec![env.snapshot.clone()]);
        }
        env.snapshot.status = EnvironmentStatus::Ready;
        env.snapshot.health = EnvironmentHealth::Green;
        Ok(vec![env.snapshot.clone()])
    }

    async fn update_environment(
        &self,
        environment: &EnvironmentName,
        label: &VersionLabel,
        _description: &str,
    ) -> Result<(), PlatformError> {
        self.record(
            "UpdateEnvironment",
            Call::UpdateEnvironment {
                environment: environment.to_string(),
                label: label.to_string(),
            },
        )?;

        let mut state = self.state.lock();
        let settle = state.settle_polls;
        if let Some(env) = state
            .environments
            .iter_mut()
            .find(|e| &e.snapshot.name == environment)
        {
            env.snapshot.status = EnvironmentStatus::Updating;
            env.snapshot.health = EnvironmentHealth::Grey;
            env.snapshot.version_label = Some(label.clone());
            env.pending_polls = settle;
        }
        Ok(())
    }

    async fn create_environment(
        &self,
        _application: &ApplicationName,
        environment: &EnvironmentName,
        label: &VersionLabel,
        template: &TemplateName,
    ) -> Result<Environment, PlatformError> {
        self.record(
            "CreateEnvironment",
            Call::CreateEnvironment {
                environment: environment.to_string(),
                label: label.to_string(),
                template: template.to_string(),
            },
        )?;

        let mut snapshot = self::environment(
            environment.as_str(),
            Some(&format!("{environment}.example.com")),
            label.as_str(),
        );
        snapshot.status = EnvironmentStatus::Launching;
        snapshot.health = EnvironmentHealth::Grey;

        let mut state = self.state.lock();
        let pending_polls = state.settle_polls;
        state.environments.push(FakeEnvironment {
            snapshot: snapshot.clone(),
            pending_polls,
        });
        Ok(snapshot)
    }

    async fn swap_hostnames(
        &self,
        source: &EnvironmentName,
        destination: &EnvironmentName,
    ) -> Result<(), PlatformError> {
        self.record(
            "SwapEnvironmentCNAMEs",
            Call::SwapHostnames {
                source: source.to_string(),
                destination: destination.to_string(),
            },
        )?;

        let mut state = self.state.lock();
        let hostname_of = |state: &FakeState, name: &EnvironmentName| {
            state
                .environments
                .iter()
                .find(|e| &e.snapshot.name == name)
                .and_then(|e| e.snapshot.hostname.clone())
        };
        let source_host = hostname_of(&*state, source);
        let destination_host = hostname_of(&*state, destination);
        for env in state.environments.iter_mut() {
            if &env.snapshot.name == source {
                env.snapshot.hostname = destination_host.clone();
            } else if &env.snapshot.name == destination {
                env.snapshot.hostname = source_host.clone();
            }
        }
        Ok(())
    }
}

#[async_trait]
impl StorageOps for FakePlatform {
    async fn put_object(&self, request: PutObject) -> Result<(), PlatformError> {
        self.record(
            "PutObject",
            Call::PutObject {
                bucket: request.location.bucket.clone(),
                key: request.location.key.clone(),
            },
        )?;
        self.state.lock().uploads.push(request);
        Ok(())
    }
}

#[async_trait]
impl EnvironmentInfoOps for FakePlatform {
    async fn request_environment_info(
        &self,
        environment: &EnvironmentName,
    ) -> Result<(), PlatformError> {
        self.record(
            "RequestEnvironmentInfo",
            Call::RequestEnvironmentInfo(environment.to_string()),
        )?;
        self.state.lock().log_requested = true;
        Ok(())
    }

    async fn retrieve_environment_info(
        &self,
        environment: &EnvironmentName,
    ) -> Result<Vec<EnvironmentInfo>, PlatformError> {
        self.record(
            "RetrieveEnvironmentInfo",
            Call::RetrieveEnvironmentInfo(environment.to_string()),
        )?;

        let mut state = self.state.lock();
        if state.log_requested {
            if state.log_polls_before_ready > 0 {
                state.log_polls_before_ready -= 1;
            } else {
                state.log_requested = false;
                let now = Utc::now();
                let sampled_at = state.log_clock_offset.map_or(now, |offset| now + offset);
                let fresh: Vec<_> = state
                    .log_instances
                    .iter()
                    .map(|instance| EnvironmentInfo {
                        instance_id: instance.clone(),
                        sampled_at,
                        url: format!("https://logs.example.com/{instance}"),
                    })
                    .collect();
                state.published_logs.extend(fresh);
            }
        }
        Ok(state.published_logs.clone())
    }
}

/// Probe answering from the fake platform: 200 with the version label as
/// body when a Ready environment is bound to the hostname, 503 otherwise.
pub struct PlatformProbe<'a> {
    platform: &'a FakePlatform,
    requests: Mutex<Vec<String>>,
}

impl<'a> PlatformProbe<'a> {
    pub fn new(platform: &'a FakePlatform) -> Self {
        Self {
            platform,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl HealthProbe for PlatformProbe<'_> {
    async fn get(&self, url: &str, read_body: bool) -> Result<ProbeResponse, PlatformError> {
        self.requests.lock().push(url.to_string());

        let hostname = url
            .split("://")
            .nth(1)
            .and_then(|rest| rest.split('/').next())
            .unwrap_or_default();

        Ok(match self.platform.served_on(hostname) {
            Some(label) => ProbeResponse {
                status: 200,
                body: read_body.then_some(label),
            },
            None => ProbeResponse {
                status: 503,
                body: None,
            },
        })
    }
}

/// Probe replaying scripted responses, then repeating the last one.
pub struct ScriptedProbe {
    responses: Mutex<VecDeque<ProbeResponse>>,
    last: Mutex<Option<ProbeResponse>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedProbe {
    pub fn new(responses: impl IntoIterator<Item = ProbeResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            last: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn always(status: u16, body: &str) -> Self {
        Self::new([response(status, body)])
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

pub fn response(status: u16, body: &str) -> ProbeResponse {
    ProbeResponse {
        status,
        body: Some(body.to_string()),
    }
}

#[async_trait]
impl HealthProbe for ScriptedProbe {
    async fn get(&self, url: &str, _read_body: bool) -> Result<ProbeResponse, PlatformError> {
        self.requests.lock().push(url.to_string());

        let next = self.responses.lock().pop_front();
        let mut last = self.last.lock();
        if let Some(response) = next {
            *last = Some(response);
        }
        last.clone()
            .ok_or_else(|| PlatformError::request("GET", "no scripted response"))
    }
}

/// Progress observer that records everything it is told.
#[derive(Default)]
pub struct RecordingProgress {
    pub phases: Mutex<Vec<Phase>>,
    pub pending: Mutex<Vec<String>>,
    pub warnings: Mutex<Vec<Warning>>,
}

impl RecordingProgress {
    pub fn phases(&self) -> Vec<Phase> {
        self.phases.lock().clone()
    }

    pub fn pending_messages(&self) -> Vec<String> {
        self.pending.lock().clone()
    }

    pub fn warnings(&self) -> Vec<Warning> {
        self.warnings.lock().clone()
    }
}

impl Progress for RecordingProgress {
    fn phase(&self, phase: Phase, _message: &str) {
        self.phases.lock().push(phase);
    }

    fn pending(&self, message: &str) {
        self.pending.lock().push(message.to_string());
    }

    fn warning(&self, warning: &Warning) {
        self.warnings.lock().push(warning.clone());
    }
}
