// ABOUTME: Validated, immutable deployment request built from configuration.
// ABOUTME: Applies every default once and rejects incomplete settings before any network call.

use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{Config, DeployType, ExpectedBody};
use crate::diagnostics::{Diagnostics, Warning};
use crate::platform::{AwsSettings, StorageLocation};
use crate::types::{ApplicationName, EnvironmentName, VersionLabel};

use super::DeployError;
use super::health::{BodyMatcher, HealthCheck};

/// How the target environment is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRef {
    Name(EnvironmentName),
    Hostname(String),
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetRef::Name(name) => write!(f, "{name}"),
            TargetRef::Hostname(hostname) => write!(f, "{hostname}"),
        }
    }
}

/// Application, target environment, and region: enough to talk to one environment.
#[derive(Debug, Clone)]
pub struct EnvironmentSelector {
    pub application: ApplicationName,
    pub target: TargetRef,
    pub region: String,
}

impl EnvironmentSelector {
    pub fn from_config(config: &Config) -> Result<Self, DeployError> {
        let application = config
            .application
            .clone()
            .filter(|a| !a.as_str().trim().is_empty())
            .ok_or_else(|| DeployError::config_error("missing \"application\""))?;

        let environment = config.environment.clone().filter(|e| !e.is_empty());
        let hostname = config.hostname.clone().filter(|h| !h.trim().is_empty());

        let target = match (environment, hostname) {
            (Some(name), None) => TargetRef::Name(name),
            (None, Some(hostname)) => TargetRef::Hostname(hostname),
            (None, None) => {
                return Err(DeployError::config_error(
                    "missing \"environment\" or \"hostname\"",
                ));
            }
            (Some(_), Some(_)) => {
                return Err(DeployError::config_error(
                    "\"environment\" and \"hostname\" are mutually exclusive",
                ));
            }
        };

        let region = config.resolved_region().ok_or_else(|| {
            DeployError::config_error("missing \"region\" (or AWS_REGION / AWS_DEFAULT_REGION)")
        })?;

        Ok(Self {
            application,
            target,
            region,
        })
    }

    /// Client settings for this selector's region.
    pub fn aws_settings(&self, config: &Config) -> Result<AwsSettings, DeployError> {
        let credentials = config.credentials.resolve()?;
        Ok(AwsSettings {
            region: self.region.clone(),
            credentials,
            endpoint_url: config.endpoint_url.clone(),
        })
    }
}

/// Poll cadence and bound for one wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wait {
    pub interval: Duration,
    pub timeout: Duration,
}

/// A fully validated deployment.
///
/// Only constructible through [`DeploymentRequest::from_config`], so holding
/// one proves every required field was present and every default applied.
#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    pub selector: EnvironmentSelector,
    pub bundle: PathBuf,
    pub version_label: VersionLabel,
    pub description: String,
    pub deploy_type: DeployType,
    pub storage: StorageLocation,
    /// `None` when no health page path is configured.
    pub health: Option<HealthCheck>,
    pub convergence: Wait,
}

impl DeploymentRequest {
    pub fn from_config(config: &Config, diag: &mut Diagnostics) -> Result<Self, DeployError> {
        let selector = EnvironmentSelector::from_config(config)?;

        let bundle = config
            .bundle
            .clone()
            .ok_or_else(|| DeployError::config_error("missing \"bundle\""))?;
        if !bundle.is_file() {
            return Err(DeployError::config_error(format!(
                "\"bundle\" points to a non-existent file: {}",
                bundle.display()
            )));
        }

        let file_name = bundle
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| DeployError::config_error("\"bundle\" has no file name"))?;
        let file_stem = bundle
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.clone());

        let version_label = config
            .version
            .label
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| VersionLabel::new(file_stem));

        let storage = StorageLocation {
            bucket: config
                .storage
                .bucket
                .clone()
                .unwrap_or_else(|| selector.application.to_string()),
            key: config.storage.key.clone().unwrap_or(file_name),
        };

        let health = match &config.health.path {
            None => {
                diag.warn(Warning::health_check_disabled());
                None
            }
            Some(path) => {
                let path = if path.starts_with('/') {
                    path.clone()
                } else {
                    format!("/{path}")
                };
                let expect = config
                    .health
                    .expect
                    .as_ref()
                    .map(compile_matcher)
                    .transpose()?;
                Some(HealthCheck {
                    path,
                    scheme: config.health.scheme,
                    expect,
                    interval: config.health.interval,
                    timeout: config.health.timeout,
                })
            }
        };

        Ok(Self {
            selector,
            bundle,
            version_label,
            description: config.version.description.clone().unwrap_or_default(),
            deploy_type: config.deploy_type,
            storage,
            health,
            convergence: Wait {
                interval: config.convergence.interval,
                timeout: config.convergence.timeout,
            },
        })
    }

    pub fn application(&self) -> &ApplicationName {
        &self.selector.application
    }
}

fn compile_matcher(expected: &ExpectedBody) -> Result<BodyMatcher, DeployError> {
    match expected {
        ExpectedBody::Literal(text) => Ok(BodyMatcher::Literal(text.clone())),
        ExpectedBody::Pattern { pattern } => Regex::new(pattern)
            .map(BodyMatcher::Pattern)
            .map_err(|e| DeployError::config_error(format!("invalid \"health.expect\" pattern: {e}"))),
    }
}
