// ABOUTME: Configuration types and parsing for ebdeploy.yml.
// ABOUTME: Handles YAML parsing, env-backed credentials, and named target merging.

mod convergence;
mod credentials;
mod deploy_type;
mod env_value;
mod healthcheck;
mod init;
mod logs;

pub use convergence::ConvergenceConfig;
pub use credentials::CredentialsConfig;
pub use deploy_type::DeployType;
pub use env_value::EnvValue;
pub use healthcheck::{ExpectedBody, HealthcheckConfig, Scheme};
pub use init::init_config;
pub use logs::LogsConfig;

use crate::error::{Error, Result};
use crate::types::{ApplicationName, EnvironmentName, VersionLabel};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "ebdeploy.yml";
pub const CONFIG_FILENAME_ALT: &str = "ebdeploy.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".ebdeploy/config.yml";

/// Raw deployment configuration as written by the user.
///
/// Required fields are optional here so that missing values surface as
/// configuration errors during request validation, together with the
/// values that can also come from the environment (region, credentials).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub application: Option<ApplicationName>,

    #[serde(default)]
    pub environment: Option<EnvironmentName>,

    /// Public CNAME of the target environment, alternative to `environment`.
    #[serde(default)]
    pub hostname: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    /// Source bundle archive to upload.
    #[serde(default)]
    pub bundle: Option<PathBuf>,

    #[serde(default)]
    pub deploy_type: DeployType,

    #[serde(default)]
    pub version: VersionConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub health: HealthcheckConfig,

    #[serde(default)]
    pub convergence: ConvergenceConfig,

    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub endpoint_url: Option<String>,

    #[serde(default)]
    pub logs: LogsConfig,

    #[serde(default)]
    pub targets: HashMap<String, Target>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionConfig {
    /// Defaults to the bundle file name without extension.
    pub label: Option<VersionLabel>,
    /// Defaults to empty.
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Defaults to the application name.
    pub bucket: Option<String>,
    /// Defaults to the bundle file name.
    pub key: Option<String>,
}

/// Per-target overrides selected with `--target`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Target {
    #[serde(default)]
    pub environment: Option<EnvironmentName>,

    #[serde(default)]
    pub hostname: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub deploy_type: Option<DeployType>,

    #[serde(default)]
    pub health: Option<HealthcheckConfig>,

    #[serde(default)]
    pub storage: Option<StorageConfig>,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;

        // Relative bundle paths are relative to the config file, not the cwd.
        if let (Some(bundle), Some(dir)) = (&config.bundle, path.parent())
            && bundle.is_relative()
        {
            config.bundle = Some(dir.join(bundle));
        }

        Ok(config)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn for_target(&self, name: &str) -> Result<Config> {
        let target = self
            .targets
            .get(name)
            .ok_or_else(|| Error::UnknownTarget(name.to_string()))?;

        let mut merged = self.clone();

        // A target names its environment one way; drop the other identifier
        // so base and target settings never combine into two targets.
        if let Some(ref environment) = target.environment {
            merged.environment = Some(environment.clone());
            merged.hostname = None;
        }
        if let Some(ref hostname) = target.hostname {
            merged.hostname = Some(hostname.clone());
            merged.environment = None;
        }

        if let Some(ref region) = target.region {
            merged.region = Some(region.clone());
        }

        if let Some(deploy_type) = target.deploy_type {
            merged.deploy_type = deploy_type;
        }

        if target.health.is_some() {
            merged.health = target.health.clone().unwrap_or_default();
        }

        if let Some(ref storage) = target.storage {
            merged.storage = storage.clone();
        }

        Ok(merged)
    }

    /// Region from config, falling back to the standard AWS variables.
    pub fn resolved_region(&self) -> Option<String> {
        let non_empty = |r: &String| !r.trim().is_empty();
        self.region
            .clone()
            .filter(non_empty)
            .or_else(|| std::env::var("AWS_REGION").ok().filter(non_empty))
            .or_else(|| std::env::var("AWS_DEFAULT_REGION").ok().filter(non_empty))
    }

    pub fn template() -> Self {
        Config {
            application: Some(ApplicationName::new("my-app")),
            environment: Some(EnvironmentName::new("my-app-prod")),
            hostname: None,
            region: Some("us-east-1".to_string()),
            bundle: Some(PathBuf::from("dist/my-app.zip")),
            deploy_type: DeployType::default(),
            version: VersionConfig::default(),
            storage: StorageConfig::default(),
            health: HealthcheckConfig::default(),
            convergence: ConvergenceConfig::default(),
            credentials: CredentialsConfig::default(),
            endpoint_url: None,
            logs: LogsConfig::default(),
            targets: HashMap::new(),
        }
    }
}
