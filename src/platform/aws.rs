// ABOUTME: Elastic Beanstalk and S3 implementation of the control-plane traits.
// ABOUTME: Wraps the AWS SDK clients behind one explicitly constructed handle.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_elasticbeanstalk::config::{Credentials, Region};
use aws_sdk_elasticbeanstalk::error::DisplayErrorContext;
use aws_sdk_elasticbeanstalk::types as sdk;
use aws_sdk_s3::primitives::ByteStream;
use chrono::{DateTime, Utc};

use super::PlatformError;
use super::traits::{
    ApplicationOps, Environment, EnvironmentFilter, EnvironmentHealth, EnvironmentInfo,
    EnvironmentInfoOps, EnvironmentOps, EnvironmentStatus, PutObject, StorageLocation, StorageOps,
};
use crate::types::{
    ApplicationName, EnvironmentId, EnvironmentName, TemplateName, VersionLabel,
};

/// Static credentials resolved from configuration.
#[derive(Debug, Clone)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

/// Everything needed to build the SDK clients.
#[derive(Debug, Clone)]
pub struct AwsSettings {
    pub region: String,
    pub credentials: AwsCredentials,
    /// Override endpoint, e.g. a localstack instance.
    pub endpoint_url: Option<String>,
}

/// Control-plane handle backed by the AWS SDK.
///
/// Built once per session from [`AwsSettings`] and passed by reference into
/// every deployment component; no process-wide client state.
#[derive(Debug, Clone)]
pub struct AwsPlatform {
    beanstalk: aws_sdk_elasticbeanstalk::Client,
    s3: aws_sdk_s3::Client,
}

impl AwsPlatform {
    /// Build SDK clients for the configured region and credentials.
    ///
    /// No request is sent here; the first network call happens on first use.
    pub async fn connect(settings: &AwsSettings) -> Self {
        let credentials = Credentials::new(
            settings.credentials.access_key_id.clone(),
            settings.credentials.secret_access_key.clone(),
            settings.credentials.session_token.clone(),
            None,
            "ebdeploy",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(credentials);

        if let Some(endpoint) = &settings.endpoint_url {
            tracing::info!("Using AWS endpoint override {}", endpoint);
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(settings.endpoint_url.is_some())
            .build();

        Self {
            beanstalk: aws_sdk_elasticbeanstalk::Client::new(&sdk_config),
            s3: aws_sdk_s3::Client::from_conf(s3_config),
        }
    }
}

fn request_failed<E: std::error::Error>(operation: &'static str) -> impl FnOnce(E) -> PlatformError {
    move |err| PlatformError::request(operation, DisplayErrorContext(&err).to_string())
}

fn malformed(operation: &'static str, message: &str) -> PlatformError {
    PlatformError::MalformedResponse {
        operation,
        message: message.to_string(),
    }
}

/// Fields shared by `EnvironmentDescription` and `CreateEnvironmentOutput`.
struct RawEnvironment<'a> {
    id: Option<&'a str>,
    name: Option<&'a str>,
    cname: Option<&'a str>,
    status: Option<&'a sdk::EnvironmentStatus>,
    health: Option<&'a sdk::EnvironmentHealth>,
    version_label: Option<&'a str>,
}

impl RawEnvironment<'_> {
    fn into_environment(self, operation: &'static str) -> Result<Environment, PlatformError> {
        let id = self
            .id
            .ok_or_else(|| malformed(operation, "environment without id"))?;
        let name = self
            .name
            .ok_or_else(|| malformed(operation, "environment without name"))?;

        Ok(Environment {
            id: EnvironmentId::new(id),
            name: EnvironmentName::new(name),
            hostname: self.cname.filter(|c| !c.is_empty()).map(str::to_string),
            status: self
                .status
                .map(|s| EnvironmentStatus::parse(s.as_str()))
                .unwrap_or_else(|| EnvironmentStatus::Other("Unknown".to_string())),
            health: self
                .health
                .map(|h| EnvironmentHealth::parse(h.as_str()))
                .unwrap_or_else(|| EnvironmentHealth::Other("Unknown".to_string())),
            version_label: self.version_label.map(VersionLabel::new),
        })
    }
}

fn describe(env: &sdk::EnvironmentDescription) -> RawEnvironment<'_> {
    RawEnvironment {
        id: env.environment_id(),
        name: env.environment_name(),
        cname: env.cname(),
        status: env.status(),
        health: env.health(),
        version_label: env.version_label(),
    }
}

fn to_chrono(timestamp: &aws_sdk_elasticbeanstalk::primitives::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos()).unwrap_or_default()
}

#[async_trait]
impl ApplicationOps for AwsPlatform {
    async fn list_applications(
        &self,
        names: &[ApplicationName],
    ) -> Result<Vec<ApplicationName>, PlatformError> {
        tracing::debug!(?names, "DescribeApplications");
        let output = self
            .beanstalk
            .describe_applications()
            .set_application_names(Some(names.iter().map(|n| n.to_string()).collect()))
            .send()
            .await
            .map_err(request_failed("DescribeApplications"))?;

        Ok(output
            .applications()
            .iter()
            .filter_map(|app| app.application_name())
            .map(ApplicationName::new)
            .collect())
    }

    async fn publish_version(
        &self,
        application: &ApplicationName,
        label: &VersionLabel,
        description: &str,
        source: &StorageLocation,
    ) -> Result<(), PlatformError> {
        tracing::debug!(%application, %label, %source, "CreateApplicationVersion");
        let bundle = sdk::S3Location::builder()
            .s3_bucket(&source.bucket)
            .s3_key(&source.key)
            .build();

        self.beanstalk
            .create_application_version()
            .application_name(application.as_str())
            .version_label(label.as_str())
            .description(description)
            .source_bundle(bundle)
            .send()
            .await
            .map_err(request_failed("CreateApplicationVersion"))?;
        Ok(())
    }

    async fn create_configuration_template(
        &self,
        application: &ApplicationName,
        environment: &EnvironmentId,
        template: &TemplateName,
    ) -> Result<TemplateName, PlatformError> {
        tracing::debug!(%application, %environment, %template, "CreateConfigurationTemplate");
        let output = self
            .beanstalk
            .create_configuration_template()
            .application_name(application.as_str())
            .environment_id(environment.as_str())
            .template_name(template.as_str())
            .send()
            .await
            .map_err(request_failed("CreateConfigurationTemplate"))?;

        Ok(output
            .template_name()
            .map(TemplateName::new)
            .unwrap_or_else(|| template.clone()))
    }
}

#[async_trait]
impl EnvironmentOps for AwsPlatform {
    async fn list_environments(
        &self,
        application: &ApplicationName,
        filter: &EnvironmentFilter,
    ) -> Result<Vec<Environment>, PlatformError> {
        tracing::debug!(%application, ?filter, "DescribeEnvironments");
        let mut request = self
            .beanstalk
            .describe_environments()
            .application_name(application.as_str())
            .include_deleted(false);

        if let EnvironmentFilter::Named(name) = filter {
            request = request.environment_names(name.as_str());
        }

        let output = request
            .send()
            .await
            .map_err(request_failed("DescribeEnvironments"))?;

        output
            .environments()
            .iter()
            .map(|env| describe(env).into_environment("DescribeEnvironments"))
            .collect()
    }

    async fn update_environment(
        &self,
        environment: &EnvironmentName,
        label: &VersionLabel,
        description: &str,
    ) -> Result<(), PlatformError> {
        tracing::debug!(%environment, %label, "UpdateEnvironment");
        self.beanstalk
            .update_environment()
            .environment_name(environment.as_str())
            .version_label(label.as_str())
            .description(description)
            .send()
            .await
            .map_err(request_failed("UpdateEnvironment"))?;
        Ok(())
    }

    async fn create_environment(
        &self,
        application: &ApplicationName,
        environment: &EnvironmentName,
        label: &VersionLabel,
        template: &TemplateName,
    ) -> Result<Environment, PlatformError> {
        tracing::debug!(%application, %environment, %label, %template, "CreateEnvironment");
        let output = self
            .beanstalk
            .create_environment()
            .application_name(application.as_str())
            .environment_name(environment.as_str())
            .version_label(label.as_str())
            .template_name(template.as_str())
            .send()
            .await
            .map_err(request_failed("CreateEnvironment"))?;

        RawEnvironment {
            id: output.environment_id(),
            name: output.environment_name(),
            cname: output.cname(),
            status: output.status(),
            health: output.health(),
            version_label: output.version_label(),
        }
        .into_environment("CreateEnvironment")
    }

    async fn swap_hostnames(
        &self,
        source: &EnvironmentName,
        destination: &EnvironmentName,
    ) -> Result<(), PlatformError> {
        tracing::debug!(%source, %destination, "SwapEnvironmentCNAMEs");
        self.beanstalk
            .swap_environment_cnames()
            .source_environment_name(source.as_str())
            .destination_environment_name(destination.as_str())
            .send()
            .await
            .map_err(request_failed("SwapEnvironmentCNAMEs"))?;
        Ok(())
    }
}

#[async_trait]
impl StorageOps for AwsPlatform {
    async fn put_object(&self, request: PutObject) -> Result<(), PlatformError> {
        tracing::debug!(
            location = %request.location,
            bytes = request.body.len(),
            "PutObject"
        );
        self.s3
            .put_object()
            .bucket(&request.location.bucket)
            .key(&request.location.key)
            .body(ByteStream::from(request.body))
            .send()
            .await
            .map_err(|e| {
                PlatformError::request(
                    "PutObject",
                    aws_sdk_s3::error::DisplayErrorContext(&e).to_string(),
                )
            })?;
        Ok(())
    }
}

#[async_trait]
impl EnvironmentInfoOps for AwsPlatform {
    async fn request_environment_info(
        &self,
        environment: &EnvironmentName,
    ) -> Result<(), PlatformError> {
        tracing::debug!(%environment, "RequestEnvironmentInfo");
        self.beanstalk
            .request_environment_info()
            .environment_name(environment.as_str())
            .info_type(sdk::EnvironmentInfoType::Tail)
            .send()
            .await
            .map_err(request_failed("RequestEnvironmentInfo"))?;
        Ok(())
    }

    async fn retrieve_environment_info(
        &self,
        environment: &EnvironmentName,
    ) -> Result<Vec<EnvironmentInfo>, PlatformError> {
        tracing::debug!(%environment, "RetrieveEnvironmentInfo");
        let output = self
            .beanstalk
            .retrieve_environment_info()
            .environment_name(environment.as_str())
            .info_type(sdk::EnvironmentInfoType::Tail)
            .send()
            .await
            .map_err(request_failed("RetrieveEnvironmentInfo"))?;

        Ok(output
            .environment_info()
            .iter()
            .filter_map(|info| {
                Some(EnvironmentInfo {
                    instance_id: info.ec2_instance_id()?.to_string(),
                    sampled_at: to_chrono(info.sample_timestamp()?),
                    url: info.message()?.to_string(),
                })
            })
            .collect())
    }
}
