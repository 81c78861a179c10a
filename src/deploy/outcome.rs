// ABOUTME: Terminal result of a deployment session.
// ABOUTME: Failures keep the error kind, the failing phase, and the last environment snapshot.

use crate::platform::Environment;

use super::state::Phase;
use super::{DeployError, DeployErrorKind};

#[derive(Debug)]
pub enum DeploymentOutcome {
    Succeeded {
        /// The environment now serving the version; `None` for a manual
        /// deploy without a target environment. After a swap its `hostname`
        /// is the public one it took over.
        environment: Option<Environment>,
    },
    Failed {
        kind: DeployErrorKind,
        error: DeployError,
        /// Phase that was running when the error occurred.
        phase: Phase,
        last_snapshot: Option<Environment>,
    },
}

impl DeploymentOutcome {
    pub(crate) fn failed(error: DeployError, phase: Phase, last_snapshot: Option<Environment>) -> Self {
        DeploymentOutcome::Failed {
            kind: error.kind(),
            error,
            phase,
            last_snapshot,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DeploymentOutcome::Succeeded { .. })
    }

    /// Convert into a `Result`, dropping the failure context.
    pub fn into_result(self) -> Result<Option<Environment>, DeployError> {
        match self {
            DeploymentOutcome::Succeeded { environment } => Ok(environment),
            DeploymentOutcome::Failed { error, .. } => Err(error),
        }
    }
}
