// ABOUTME: Error types for deployment operations.
// ABOUTME: Covers configuration, missing resources, timeouts, and failed control-plane calls.

use std::path::PathBuf;
use std::time::Duration;

use crate::platform::PlatformError;

/// Errors that abort a deployment session.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// A required setting is missing or contradicts another one.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The source bundle could not be read.
    #[error("failed to read source bundle {path}: {source}")]
    BundleUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The application does not exist.
    #[error("application \"{0}\" does not exist")]
    ApplicationNotFound(String),

    /// No non-deleted environment matched the name or hostname.
    #[error("environment \"{0}\" does not exist")]
    EnvironmentNotFound(String),

    /// The environment has no public hostname to health check.
    #[error("environment \"{0}\" has no hostname")]
    MissingHostname(String),

    /// A convergence or health wait exceeded its bound.
    #[error("timed out after {}s waiting for {resource} to {condition}", .timeout.as_secs())]
    Timeout {
        resource: String,
        condition: String,
        timeout: Duration,
    },

    /// A control-plane call failed outright.
    #[error(transparent)]
    Call(#[from] PlatformError),

    /// The driver fed the state machine an event its current state cannot accept.
    #[error("unexpected {event} event while {phase}")]
    UnexpectedEvent {
        phase: super::state::Phase,
        event: &'static str,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum DeployErrorKind {
    Configuration,
    ResourceNotFound,
    Timeout,
    TransientCall,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Configuration(_)
            | DeployError::BundleUnreadable { .. }
            | DeployError::UnexpectedEvent { .. } => DeployErrorKind::Configuration,
            DeployError::ApplicationNotFound(_)
            | DeployError::EnvironmentNotFound(_)
            | DeployError::MissingHostname(_) => DeployErrorKind::ResourceNotFound,
            DeployError::Timeout { .. } => DeployErrorKind::Timeout,
            DeployError::Call(_) => DeployErrorKind::TransientCall,
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        DeployError::Configuration(message.into())
    }

    pub(crate) fn timeout(
        resource: impl Into<String>,
        condition: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        DeployError::Timeout {
            resource: resource.into(),
            condition: condition.into(),
            timeout,
        }
    }
}

impl From<crate::error::Error> for DeployError {
    fn from(err: crate::error::Error) -> Self {
        match err {
            crate::error::Error::Deploy(inner) => inner,
            crate::error::Error::Platform(inner) => DeployError::Call(inner),
            other => DeployError::Configuration(other.to_string()),
        }
    }
}
