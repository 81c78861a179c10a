// ABOUTME: Pure transition function of the deployment state machine.
// ABOUTME: Maps (state, event) to the next state and the action the driver must perform.

use crate::config::DeployType;
use crate::platform::Environment;

use super::DeployError;
use super::outcome::DeploymentOutcome;
use super::request::DeploymentRequest;
use super::state::{Action, Event, Phase, State};

/// Compute the next state and action.
///
/// Performs no I/O. Any `Event::Failed` ends the session in `Failed`
/// without compensation; an event the current state does not expect does
/// the same with [`DeployError::UnexpectedEvent`].
pub fn advance(request: &DeploymentRequest, state: State, event: Event) -> (State, Action) {
    match (state, event) {
        (State::Validating, Event::Start) => (State::Resolving, Action::Resolve),

        (State::Resolving, Event::Resolved(target)) => {
            (State::Uploading { target }, Action::Upload)
        }

        (State::Uploading { target }, Event::Uploaded) => {
            (State::Publishing { target }, Action::Publish)
        }

        (State::Publishing { target }, Event::Published) => match (request.deploy_type, target) {
            (DeployType::Manual, environment) => succeed(environment),
            (_, None) => fail(
                DeployError::EnvironmentNotFound(request.selector.target.to_string()),
                Phase::Publishing,
                None,
            ),
            (DeployType::InPlace, Some(target)) => {
                let name = target.name.clone();
                (State::Deploying { target }, Action::UpdateEnvironment(name))
            }
            (DeployType::SwapToNew, Some(target)) => {
                let from = target.clone();
                (State::Deploying { target }, Action::CreateEnvironment { from })
            }
        },

        (State::Deploying { target }, Event::Updated) => {
            let name = target.name.clone();
            (
                State::Converging {
                    target,
                    original: None,
                },
                Action::AwaitReady(name),
            )
        }

        (State::Deploying { target: original }, Event::Created(created)) => {
            let name = created.name.clone();
            (
                State::Converging {
                    target: created,
                    original: Some(original),
                },
                Action::AwaitReady(name),
            )
        }

        (State::Converging { original, .. }, Event::Converged(snapshot)) => {
            verify(request, snapshot, original, Phase::Verifying)
        }

        (
            State::Verifying {
                target,
                original: None,
            },
            Event::Healthy,
        ) => succeed(Some(target)),

        (
            State::Verifying {
                target,
                original: Some(original),
            },
            Event::Healthy,
        ) => {
            let source = original.name.clone();
            let destination = target.name.clone();
            (
                State::Swapping {
                    original,
                    replacement: target,
                },
                Action::Swap {
                    source,
                    destination,
                },
            )
        }

        // The original snapshot predates the swap, so its hostname is the
        // public name the replacement now answers on.
        (
            State::Swapping {
                original,
                replacement,
            },
            Event::Swapped,
        ) => {
            let hostname = original.hostname.clone();
            if hostname.is_none() && request.health.is_some() {
                return fail(
                    DeployError::MissingHostname(original.name.to_string()),
                    Phase::Swapping,
                    Some(replacement),
                );
            }
            (
                State::ReVerifying {
                    original,
                    replacement,
                },
                Action::VerifyHealth { hostname },
            )
        }

        (
            State::ReVerifying {
                original,
                mut replacement,
            },
            Event::Healthy,
        ) => {
            // The public hostname now routes to the replacement.
            replacement.hostname = original.hostname;
            succeed(Some(replacement))
        }

        (state, Event::Failed(error)) => {
            let phase = state.phase();
            let snapshot = state.last_snapshot().cloned();
            fail(error, phase, snapshot)
        }

        (state, event) => {
            let phase = state.phase();
            let snapshot = state.last_snapshot().cloned();
            fail(
                DeployError::UnexpectedEvent {
                    phase,
                    event: event.name(),
                },
                phase,
                snapshot,
            )
        }
    }
}

fn verify(
    request: &DeploymentRequest,
    target: Environment,
    original: Option<Environment>,
    phase: Phase,
) -> (State, Action) {
    let hostname = target.hostname.clone();
    if hostname.is_none() && request.health.is_some() {
        return fail(
            DeployError::MissingHostname(target.name.to_string()),
            phase,
            Some(target),
        );
    }
    (
        State::Verifying { target, original },
        Action::VerifyHealth { hostname },
    )
}

fn succeed(environment: Option<Environment>) -> (State, Action) {
    (
        State::Succeeded,
        Action::Finish(DeploymentOutcome::Succeeded { environment }),
    )
}

fn fail(error: DeployError, phase: Phase, last_snapshot: Option<Environment>) -> (State, Action) {
    (
        State::Failed { phase },
        Action::Finish(DeploymentOutcome::failed(error, phase, last_snapshot)),
    )
}
