// ABOUTME: Observer trait for deployment progress reporting.
// ABOUTME: Lets the CLI surface phase changes and pending-state polls as they happen.

use crate::diagnostics::Warning;

use super::state::Phase;

/// Receives informational progress from a running deployment.
///
/// Nothing reported here is an error; failures are returned as values.
pub trait Progress: Send + Sync {
    /// The state machine entered a new phase.
    fn phase(&self, phase: Phase, message: &str);

    /// A wait loop observed a not-yet-ready state.
    fn pending(&self, message: &str);

    /// A non-fatal problem worth showing to the operator.
    fn warning(&self, warning: &Warning);
}

/// Discards all progress; useful for library callers and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Progress for Silent {
    fn phase(&self, _phase: Phase, _message: &str) {}

    fn pending(&self, _message: &str) {}

    fn warning(&self, _warning: &Warning) {}
}
