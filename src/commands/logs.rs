// ABOUTME: Logs command implementation.
// ABOUTME: Resolves the target environment and downloads its tail logs.

use super::platform_connection::connect_to_platform;
use ebdeploy::config::Config;
use ebdeploy::deploy::{EnvironmentSelector, Wait, resolver};
use ebdeploy::error::Result;
use ebdeploy::logs::{HttpLogFetcher, retrieve_logs};
use ebdeploy::output::Output;
use std::path::PathBuf;

pub async fn logs(config: Config, output_dir: Option<PathBuf>, mut output: Output) -> Result<()> {
    let selector = EnvironmentSelector::from_config(&config)?;
    output.start_timer();

    let platform = connect_to_platform(&selector, &config, &output).await?;
    let environment =
        resolver::require_environment(&platform, &selector.application, &selector.target)
            .await?;

    output.progress(&format!(
        "Requesting logs for environment {}...",
        environment.name
    ));

    let fetcher = HttpLogFetcher::new()?;
    let dir = output_dir.unwrap_or_else(|| config.logs.output.clone());
    let written = retrieve_logs(
        &platform,
        &fetcher,
        &environment.name,
        &dir,
        Wait {
            interval: config.logs.interval,
            timeout: config.logs.timeout,
        },
        &output,
    )
    .await?;

    output.success(&format!("Wrote {} log file(s)", written.len()));
    Ok(())
}
