// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates ebdeploy.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{ApplicationName, EnvironmentName};

use super::{CONFIG_FILENAME, Config};

pub fn init_config(
    dir: &Path,
    application: Option<&str>,
    environment: Option<&str>,
    force: bool,
) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(app) = application {
        if app.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "application name cannot be empty".to_string(),
            ));
        }
        config.application = Some(ApplicationName::new(app));
        config.environment = Some(EnvironmentName::new(format!("{app}-prod")));
    }

    if let Some(env) = environment {
        config.environment = Some(EnvironmentName::new(env));
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    format!(
        r#"application: {}
environment: {}
# Or select the environment by its public CNAME instead:
# hostname: my-app.us-east-1.elasticbeanstalk.com
region: {}
bundle: {}

# in-place | swap-to-new | manual
deploy_type: {}

health:
  # Strongly recommended: without a path no health check is performed.
  path: /health
  scheme: http
  # expect: "OK"
  # expect:
  #   pattern: '^v\d+\.\d+\.\d+$'
  interval: 10s
  timeout: 5m

convergence:
  interval: 20s
  timeout: 10m

# Credentials default to AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY.
# credentials:
#   access_key_id:
#     env: DEPLOY_ACCESS_KEY_ID
"#,
        config.application.as_ref().map(|a| a.as_str()).unwrap_or("my-app"),
        config
            .environment
            .as_ref()
            .map(|e| e.as_str())
            .unwrap_or("my-app-prod"),
        config.region.as_deref().unwrap_or("us-east-1"),
        config
            .bundle
            .as_ref()
            .map(|b| b.display().to_string())
            .unwrap_or_default(),
        config.deploy_type,
    )
}
