// ABOUTME: Deployment states, the events that move between them, and the actions they request.
// ABOUTME: States carry the environment snapshots later steps depend on.

use std::fmt;

use crate::platform::Environment;
use crate::types::EnvironmentName;

use super::DeployError;
use super::outcome::DeploymentOutcome;

/// Where a deployment session currently is, without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Phase {
    Validating,
    Resolving,
    Uploading,
    Publishing,
    Deploying,
    Converging,
    Verifying,
    Swapping,
    ReVerifying,
    Succeeded,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Validating => "validating",
            Phase::Resolving => "resolving",
            Phase::Uploading => "uploading",
            Phase::Publishing => "publishing",
            Phase::Deploying => "deploying",
            Phase::Converging => "converging",
            Phase::Verifying => "verifying",
            Phase::Swapping => "swapping",
            Phase::ReVerifying => "re-verifying",
            Phase::Succeeded => "succeeded",
            Phase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A deployment session state.
///
/// `target` is the environment being updated or verified. During a
/// blue-green deploy `original` is the environment whose hostname will be
/// taken over, as it was when resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    /// The request has been validated; nothing has touched the network yet.
    Validating,
    Resolving,
    /// `target` is `None` only when the deploy type tolerates a missing environment.
    Uploading { target: Option<Environment> },
    Publishing { target: Option<Environment> },
    Deploying { target: Environment },
    Converging {
        target: Environment,
        original: Option<Environment>,
    },
    Verifying {
        target: Environment,
        original: Option<Environment>,
    },
    Swapping {
        original: Environment,
        replacement: Environment,
    },
    ReVerifying {
        original: Environment,
        replacement: Environment,
    },
    Succeeded,
    Failed { phase: Phase },
}

impl State {
    pub fn phase(&self) -> Phase {
        match self {
            State::Validating => Phase::Validating,
            State::Resolving => Phase::Resolving,
            State::Uploading { .. } => Phase::Uploading,
            State::Publishing { .. } => Phase::Publishing,
            State::Deploying { .. } => Phase::Deploying,
            State::Converging { .. } => Phase::Converging,
            State::Verifying { .. } => Phase::Verifying,
            State::Swapping { .. } => Phase::Swapping,
            State::ReVerifying { .. } => Phase::ReVerifying,
            State::Succeeded => Phase::Succeeded,
            State::Failed { .. } => Phase::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Succeeded | State::Failed { .. })
    }

    /// The most recent environment snapshot this state holds.
    pub fn last_snapshot(&self) -> Option<&Environment> {
        match self {
            State::Uploading { target } | State::Publishing { target } => target.as_ref(),
            State::Deploying { target }
            | State::Converging { target, .. }
            | State::Verifying { target, .. } => Some(target),
            State::Swapping { replacement, .. } | State::ReVerifying { replacement, .. } => {
                Some(replacement)
            }
            State::Validating | State::Resolving | State::Succeeded | State::Failed { .. } => None,
        }
    }
}

/// The result of the last action, fed back into the state machine.
#[derive(Debug)]
pub enum Event {
    /// Kick off a validated session.
    Start,
    Resolved(Option<Environment>),
    Uploaded,
    Published,
    /// The in-place update call was accepted.
    Updated,
    /// The parallel environment was created.
    Created(Environment),
    Converged(Environment),
    Healthy,
    Swapped,
    Failed(DeployError),
}

impl Event {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Event::Start => "start",
            Event::Resolved(_) => "resolved",
            Event::Uploaded => "uploaded",
            Event::Published => "published",
            Event::Updated => "updated",
            Event::Created(_) => "created",
            Event::Converged(_) => "converged",
            Event::Healthy => "healthy",
            Event::Swapped => "swapped",
            Event::Failed(_) => "failed",
        }
    }
}

/// The side effect the driver should perform next.
#[derive(Debug)]
pub enum Action {
    Resolve,
    Upload,
    Publish,
    UpdateEnvironment(EnvironmentName),
    /// Snapshot `from` as a template and launch a parallel environment.
    CreateEnvironment { from: Environment },
    AwaitReady(EnvironmentName),
    /// `None` only when no health page is configured.
    VerifyHealth { hostname: Option<String> },
    Swap {
        source: EnvironmentName,
        destination: EnvironmentName,
    },
    Finish(DeploymentOutcome),
}
