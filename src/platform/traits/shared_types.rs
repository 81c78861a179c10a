// ABOUTME: Shared types used across control-plane trait definitions.
// ABOUTME: Environment snapshots, status and health enums, storage locations.

use crate::types::{EnvironmentId, EnvironmentName, VersionLabel};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Lifecycle status reported by the platform for an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EnvironmentStatus {
    Launching,
    Updating,
    Ready,
    Terminating,
    Terminated,
    /// Any status this tool does not act on (e.g. `Aborting`, `LinkingTo`).
    Other(String),
}

impl EnvironmentStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "Launching" => Self::Launching,
            "Updating" => Self::Updating,
            "Ready" => Self::Ready,
            "Terminating" => Self::Terminating,
            "Terminated" => Self::Terminated,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Launching => "Launching",
            Self::Updating => "Updating",
            Self::Ready => "Ready",
            Self::Terminating => "Terminating",
            Self::Terminated => "Terminated",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for EnvironmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse health colour reported by the platform for an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EnvironmentHealth {
    Green,
    Yellow,
    Red,
    Grey,
    Other(String),
}

impl EnvironmentHealth {
    pub fn parse(value: &str) -> Self {
        match value {
            "Green" => Self::Green,
            "Yellow" => Self::Yellow,
            "Red" => Self::Red,
            "Grey" => Self::Grey,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Green => "Green",
            Self::Yellow => "Yellow",
            Self::Red => "Red",
            Self::Grey => "Grey",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for EnvironmentHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable snapshot of an environment as returned by one describe call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Environment {
    pub id: EnvironmentId,
    pub name: EnvironmentName,
    /// Public CNAME; absent while the platform is still assigning one.
    pub hostname: Option<String>,
    pub status: EnvironmentStatus,
    pub health: EnvironmentHealth,
    /// Version label currently deployed (absent for an empty environment).
    pub version_label: Option<VersionLabel>,
}

impl Environment {
    /// Ready, Green, and running `label`.
    pub fn is_converged_on(&self, label: &VersionLabel) -> bool {
        self.version_label.as_ref() == Some(label)
            && self.status == EnvironmentStatus::Ready
            && self.health == EnvironmentHealth::Green
    }
}

/// Which environments a describe call should return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentFilter {
    /// Every non-deleted environment of the application.
    All,
    /// Only the environment with this name.
    Named(EnvironmentName),
}

/// An object location in blob storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageLocation {
    pub bucket: String,
    pub key: String,
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// A single blob upload.
#[derive(Debug, Clone)]
pub struct PutObject {
    pub location: StorageLocation,
    pub body: Vec<u8>,
}

/// One instance's log bundle produced by a log request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentInfo {
    pub instance_id: String,
    pub sampled_at: DateTime<Utc>,
    /// Presigned URL the log content can be downloaded from.
    pub url: String,
}
