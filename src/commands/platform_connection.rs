// ABOUTME: Shared helper for building the AWS control-plane handle.
// ABOUTME: Used by the deploy, status, and logs commands.

use ebdeploy::config::Config;
use ebdeploy::deploy::EnvironmentSelector;
use ebdeploy::error::Result;
use ebdeploy::output::Output;
use ebdeploy::platform::AwsPlatform;

/// Resolve credentials and build clients for the selector's region.
pub async fn connect_to_platform(
    selector: &EnvironmentSelector,
    config: &Config,
    output: &Output,
) -> Result<AwsPlatform> {
    let settings = selector.aws_settings(config)?;
    output.progress(&format!("  → Connecting to {}...", settings.region));
    Ok(AwsPlatform::connect(&settings).await)
}
