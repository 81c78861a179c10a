// ABOUTME: Composable capability traits for the hosting control plane.
// ABOUTME: Defines ApplicationOps, EnvironmentOps, StorageOps, EnvironmentInfoOps.

mod application;
mod environment;
mod environment_info;
mod shared_types;
mod storage;

pub use application::ApplicationOps;
pub use environment::EnvironmentOps;
pub use environment_info::EnvironmentInfoOps;
pub use shared_types::*;
pub use storage::StorageOps;

/// Everything a deployment session needs from the control plane.
pub trait Platform: ApplicationOps + EnvironmentOps + StorageOps {}

impl<T: ApplicationOps + EnvironmentOps + StorageOps> Platform for T {}
