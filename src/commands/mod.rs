// ABOUTME: Command module aggregator for the ebdeploy CLI.
// ABOUTME: Re-exports deploy, status, and logs command handlers.

mod deploy;
mod logs;
mod platform_connection;
mod status;

pub use deploy::{DeployOverrides, deploy};
pub use logs::logs;
pub use status::status;
