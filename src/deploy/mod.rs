// ABOUTME: Deployment orchestration as an explicit state machine.
// ABOUTME: Exports the request, the driver, its building blocks, and the outcome.

mod deployment;
mod error;
mod health;
mod outcome;
pub mod poller;
mod progress;
pub mod publish;
mod request;
pub mod resolver;
mod state;
pub mod swap;
mod transitions;

pub use deployment::Deployment;
pub use error::{DeployError, DeployErrorKind};
pub use health::{BodyMatcher, HealthCheck, HealthProbe, HttpProbe, ProbeResponse, await_healthy};
pub use outcome::DeploymentOutcome;
pub use progress::{Progress, Silent};
pub use request::{DeploymentRequest, EnvironmentSelector, TargetRef, Wait};
pub use state::{Action, Event, Phase, State};
pub use transitions::advance;
