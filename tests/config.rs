// ABOUTME: Integration tests for configuration parsing and validation.
// ABOUTME: Tests YAML parsing, env-backed credentials, region fallback, and target merging.

use ebdeploy::config::*;
use ebdeploy::deploy::{DeployErrorKind, DeploymentRequest, EnvironmentSelector, TargetRef};
use ebdeploy::diagnostics::Diagnostics;
use ebdeploy::error::Error;
use std::time::Duration;

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let yaml = r#"
application: shop
environment: shop-prod
bundle: dist/shop.zip
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.application.unwrap().as_str(), "shop");
        assert_eq!(config.environment.unwrap().as_str(), "shop-prod");
        assert_eq!(config.deploy_type, DeployType::InPlace);
        assert!(config.health.path.is_none());
        assert_eq!(config.health.scheme, Scheme::Http);
        assert_eq!(config.health.interval, Duration::from_secs(10));
        assert_eq!(config.health.timeout, Duration::from_secs(300));
        assert_eq!(config.convergence.interval, Duration::from_secs(20));
        assert_eq!(config.convergence.timeout, Duration::from_secs(600));
        assert_eq!(config.logs.interval, Duration::from_secs(2));
        assert_eq!(config.logs.timeout, Duration::from_secs(30));
        assert!(config.targets.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
application: shop
hostname: shop.eu-west-1.elasticbeanstalk.com
region: eu-west-1
bundle: dist/shop-1.4.0.zip
deploy_type: swap-to-new

version:
  label: "1.4.0"
  description: Release 1.4.0

storage:
  bucket: shop-artifacts
  key: releases/shop-1.4.0.zip

health:
  path: /status
  scheme: https
  expect:
    pattern: '^v\d+\.\d+\.\d+$'
  interval: 5s
  timeout: 2m

convergence:
  interval: 30s
  timeout: 15m

endpoint_url: http://localhost:4566

logs:
  output: ./logs
  interval: 1s
  timeout: 1m
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert!(config.environment.is_none());
        assert_eq!(
            config.hostname.as_deref(),
            Some("shop.eu-west-1.elasticbeanstalk.com")
        );
        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.deploy_type, DeployType::SwapToNew);
        assert_eq!(config.version.label.unwrap().as_str(), "1.4.0");
        assert_eq!(config.version.description.as_deref(), Some("Release 1.4.0"));
        assert_eq!(config.storage.bucket.as_deref(), Some("shop-artifacts"));
        assert_eq!(
            config.storage.key.as_deref(),
            Some("releases/shop-1.4.0.zip")
        );
        assert_eq!(config.health.path.as_deref(), Some("/status"));
        assert_eq!(config.health.scheme, Scheme::Https);
        assert_eq!(
            config.health.expect,
            Some(ExpectedBody::Pattern {
                pattern: r"^v\d+\.\d+\.\d+$".to_string()
            })
        );
        assert_eq!(config.health.interval, Duration::from_secs(5));
        assert_eq!(config.health.timeout, Duration::from_secs(120));
        assert_eq!(config.convergence.timeout, Duration::from_secs(900));
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));
        assert_eq!(config.logs.output, std::path::PathBuf::from("./logs"));
    }

    #[test]
    fn literal_expected_body() {
        let yaml = r#"
application: shop
environment: shop-prod
health:
  path: /
  expect: OK
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(
            config.health.expect,
            Some(ExpectedBody::Literal("OK".to_string()))
        );
    }

    #[test]
    fn camel_case_deploy_types_are_accepted() {
        for (raw, expected) in [
            ("inPlace", DeployType::InPlace),
            ("swapToNew", DeployType::SwapToNew),
            ("manual", DeployType::Manual),
            ("in-place", DeployType::InPlace),
        ] {
            let yaml = format!("application: shop\ndeploy_type: {raw}\n");
            let config = Config::from_yaml(&yaml).unwrap();
            assert_eq!(config.deploy_type, expected, "{raw}");
        }
    }

    #[test]
    fn unknown_deploy_type_is_rejected() {
        let result = Config::from_yaml("application: shop\ndeploy_type: rolling\n");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("unknown deploy type"));
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        let yaml = "application: shop\nhealth:\n  scheme: ftp\n";
        assert!(Config::from_yaml(yaml).is_err());
    }
}

mod targets {
    use super::*;

    const YAML: &str = r#"
application: shop
environment: shop-prod
region: us-east-1
health:
  path: /health
targets:
  staging:
    environment: shop-staging
    region: eu-west-1
    deploy_type: manual
  public:
    hostname: shop.example.com
    deploy_type: swapToNew
    health:
      path: /ready
      scheme: https
"#;

    #[test]
    fn target_overrides_environment_and_region() {
        let config = Config::from_yaml(YAML).unwrap();
        let staging = config.for_target("staging").unwrap();

        assert_eq!(staging.environment.unwrap().as_str(), "shop-staging");
        assert_eq!(staging.region.as_deref(), Some("eu-west-1"));
        assert_eq!(staging.deploy_type, DeployType::Manual);
        // Untouched settings carry over.
        assert_eq!(staging.health.path.as_deref(), Some("/health"));
    }

    #[test]
    fn hostname_target_replaces_environment() {
        let config = Config::from_yaml(YAML).unwrap();
        let public = config.for_target("public").unwrap();

        assert!(public.environment.is_none());
        assert_eq!(public.hostname.as_deref(), Some("shop.example.com"));
        assert_eq!(public.deploy_type, DeployType::SwapToNew);
        assert_eq!(public.health.path.as_deref(), Some("/ready"));
        assert_eq!(public.health.scheme, Scheme::Https);
        assert_eq!(public.region.as_deref(), Some("us-east-1"));

        let selector = EnvironmentSelector::from_config(&public).unwrap();
        assert_eq!(
            selector.target,
            TargetRef::Hostname("shop.example.com".to_string())
        );
    }

    #[test]
    fn unknown_target_is_an_error() {
        let config = Config::from_yaml(YAML).unwrap();
        let err = config.for_target("production").unwrap_err();
        assert!(matches!(err, Error::UnknownTarget(name) if name == "production"));
    }
}

mod environment {
    use super::*;

    #[test]
    fn region_falls_back_to_aws_region() {
        temp_env::with_vars(
            [
                ("AWS_REGION", Some("ap-southeast-2")),
                ("AWS_DEFAULT_REGION", Some("us-west-2")),
            ],
            || {
                let config = Config::from_yaml("application: shop\n").unwrap();
                assert_eq!(config.resolved_region().as_deref(), Some("ap-southeast-2"));
            },
        );
    }

    #[test]
    fn region_falls_back_to_default_region() {
        temp_env::with_vars(
            [
                ("AWS_REGION", None),
                ("AWS_DEFAULT_REGION", Some("us-west-2")),
            ],
            || {
                let config = Config::from_yaml("application: shop\n").unwrap();
                assert_eq!(config.resolved_region().as_deref(), Some("us-west-2"));
            },
        );
    }

    #[test]
    fn explicit_region_wins() {
        temp_env::with_var("AWS_REGION", Some("ap-southeast-2"), || {
            let config = Config::from_yaml("application: shop\nregion: eu-central-1\n").unwrap();
            assert_eq!(config.resolved_region().as_deref(), Some("eu-central-1"));
        });
    }

    #[test]
    fn missing_region_is_a_configuration_error() {
        temp_env::with_vars_unset(["AWS_REGION", "AWS_DEFAULT_REGION"], || {
            let config =
                Config::from_yaml("application: shop\nenvironment: shop-prod\n").unwrap();
            let err = EnvironmentSelector::from_config(&config).unwrap_err();
            assert_eq!(err.kind(), DeployErrorKind::Configuration);
            assert!(err.to_string().contains("region"));
        });
    }

    #[test]
    fn default_credentials_come_from_aws_variables() {
        temp_env::with_vars(
            [
                ("AWS_ACCESS_KEY_ID", Some("AKIDEXAMPLE")),
                ("AWS_SECRET_ACCESS_KEY", Some("secret")),
                ("AWS_SESSION_TOKEN", None),
            ],
            || {
                let config = Config::from_yaml("application: shop\n").unwrap();
                let credentials = config.credentials.resolve().unwrap();
                assert_eq!(credentials.access_key_id, "AKIDEXAMPLE");
                assert_eq!(credentials.secret_access_key, "secret");
                assert!(credentials.session_token.is_none());
            },
        );
    }

    #[test]
    fn credentials_from_custom_variables_with_default() {
        let yaml = r#"
application: shop
credentials:
  access_key_id:
    env: DEPLOY_KEY_ID
  secret_access_key:
    env: DEPLOY_SECRET
    default: fallback-secret
  session_token: literal-token
"#;
        temp_env::with_vars(
            [("DEPLOY_KEY_ID", Some("AKIDCUSTOM")), ("DEPLOY_SECRET", None)],
            || {
                let config = Config::from_yaml(yaml).unwrap();
                let credentials = config.credentials.resolve().unwrap();
                assert_eq!(credentials.access_key_id, "AKIDCUSTOM");
                assert_eq!(credentials.secret_access_key, "fallback-secret");
                assert_eq!(credentials.session_token.as_deref(), Some("literal-token"));
            },
        );
    }

    #[test]
    fn missing_credentials_name_the_variable() {
        temp_env::with_vars_unset(["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY"], || {
            let config = Config::from_yaml("application: shop\n").unwrap();
            let err = config.credentials.resolve().unwrap_err();
            assert!(matches!(err, Error::MissingEnvVar(var) if var == "AWS_ACCESS_KEY_ID"));
        });
    }
}

mod files {
    use super::*;
    use std::fs;

    #[test]
    fn discover_prefers_ebdeploy_yml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ebdeploy.yml"), "application: primary\n").unwrap();
        fs::write(dir.path().join("ebdeploy.yaml"), "application: secondary\n").unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.application.unwrap().as_str(), "primary");
    }

    #[test]
    fn discover_finds_dot_directory_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".ebdeploy")).unwrap();
        fs::write(
            dir.path().join(".ebdeploy/config.yml"),
            "application: hidden\n",
        )
        .unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.application.unwrap().as_str(), "hidden");
    }

    #[test]
    fn discover_without_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::discover(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }

    #[test]
    fn relative_bundle_resolves_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ebdeploy.yml");
        fs::write(&path, "application: shop\nbundle: dist/shop.zip\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.bundle.unwrap(), dir.path().join("dist/shop.zip"));
    }

    #[test]
    fn init_template_round_trips_into_a_request() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), Some("shop"), None, false).unwrap();
        fs::create_dir_all(dir.path().join("dist")).unwrap();
        fs::write(dir.path().join("dist/my-app.zip"), b"bundle").unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.environment.as_ref().unwrap().as_str(), "shop-prod");

        let mut diag = Diagnostics::default();
        let request = DeploymentRequest::from_config(&config, &mut diag).unwrap();
        assert_eq!(request.version_label.as_str(), "my-app");
        assert_eq!(request.storage.bucket, "shop");
        assert!(request.health.is_some());
        assert!(!diag.has_warnings());
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), None, None, false).unwrap();
        let err = init_config(dir.path(), None, None, false).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
        init_config(dir.path(), None, None, true).unwrap();
    }
}
