// ABOUTME: Status command implementation.
// ABOUTME: Prints the target environment's hostname, status, health, and version.

use super::platform_connection::connect_to_platform;
use ebdeploy::config::Config;
use ebdeploy::deploy::{EnvironmentSelector, resolver};
use ebdeploy::error::Result;
use ebdeploy::output::{Output, OutputMode};

pub async fn status(config: Config, output: Output) -> Result<()> {
    let selector = EnvironmentSelector::from_config(&config)?;
    let platform = connect_to_platform(&selector, &config, &output).await?;

    let environment =
        resolver::require_environment(&platform, &selector.application, &selector.target)
            .await?;

    if output.mode() == OutputMode::Json {
        println!("{}", serde_json::to_string(&environment).unwrap_or_default());
        return Ok(());
    }

    println!("Application: {}", selector.application);
    println!("Environment: {} ({})", environment.name, environment.id);
    println!(
        "Hostname: {}",
        environment.hostname.as_deref().unwrap_or("-")
    );
    println!("Status: {}", environment.status);
    println!("Health: {}", environment.health);
    println!(
        "Version: {}",
        environment
            .version_label
            .as_ref()
            .map(|l| l.as_str())
            .unwrap_or("-")
    );
    Ok(())
}
