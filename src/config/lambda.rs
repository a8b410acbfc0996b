use crate::config::toml_config::{AssistantConfig, GeneralistConfig, MatchingConfig};
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{AssistantError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use aws_sdk_s3::Client as S3Client;
use std::env;

/// Lambda settings come from the environment: where the knowledge document
/// lives in S3, plus the same assistant settings the TOML file carries.
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub knowledge_bucket: String,
    pub knowledge_key: String,
    pub s3_region: String,
    /// Custom S3 endpoint such as LocalStack. Unset means real S3.
    pub s3_endpoint: Option<String>,
    pub assistant: AssistantConfig,
}

fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        let mut assistant = AssistantConfig::default();
        if let Some(name) = env_value("COLLEGE_NAME") {
            assistant.assistant.college_name = name;
        }
        if let Some(model) = env_value("GEMINI_MODEL") {
            assistant.generalist.model = model;
        }
        if let Some(base_url) = env_value("GEMINI_BASE_URL") {
            assistant.generalist.base_url = base_url;
        }
        if let Some(timeout) = env_value("GEMINI_TIMEOUT_SECONDS") {
            assistant.generalist.timeout_seconds =
                timeout
                    .parse()
                    .map_err(|_| AssistantError::InvalidConfigValueError {
                        field: "GEMINI_TIMEOUT_SECONDS".to_string(),
                        value: timeout.clone(),
                        reason: "must be a whole number of seconds".to_string(),
                    })?;
        }

        let knowledge_bucket =
            env_value("KNOWLEDGE_BUCKET").ok_or_else(|| AssistantError::ConfigError {
                message: "KNOWLEDGE_BUCKET environment variable is required".to_string(),
            })?;
        let knowledge_key = env_value("KNOWLEDGE_KEY").unwrap_or_else(|| "data.json".to_string());
        assistant.knowledge.path = knowledge_key.clone();

        Ok(Self {
            knowledge_bucket,
            knowledge_key,
            s3_region: env_value("S3_REGION").unwrap_or_else(|| "ap-south-1".to_string()),
            s3_endpoint: env_value("S3_ENDPOINT_URL"),
            assistant,
        })
    }

    /// Path-style addressing is only for custom endpoints; real S3 uses
    /// virtual-hosted buckets.
    pub fn path_style_addressing(&self) -> bool {
        self.s3_endpoint.is_some()
    }
}

impl ConfigProvider for LambdaConfig {
    fn college_name(&self) -> &str {
        self.assistant.college_name()
    }

    fn greeting(&self) -> &str {
        self.assistant.greeting()
    }

    fn knowledge_path(&self) -> &str {
        &self.knowledge_key
    }

    fn matching(&self) -> &MatchingConfig {
        self.assistant.matching()
    }

    fn generalist(&self) -> &GeneralistConfig {
        self.assistant.generalist()
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        validate_s3_bucket_name("knowledge_bucket", &self.knowledge_bucket)?;
        validate_non_empty_string("knowledge_key", &self.knowledge_key)?;
        validate_aws_region("s3_region", &self.s3_region)?;
        if let Some(endpoint) = &self.s3_endpoint {
            validate_url("s3_endpoint", endpoint)?;
        }
        self.assistant.validate()?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

fn validate_s3_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    let invalid = |reason: &str| AssistantError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: bucket_name.to_string(),
        reason: reason.to_string(),
    };

    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(invalid("S3 bucket name must be between 3 and 63 characters"));
    }
    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(invalid(
            "S3 bucket name can only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }
    if bucket_name.starts_with('-') || bucket_name.ends_with('-') {
        return Err(invalid("S3 bucket name cannot start or end with a hyphen"));
    }
    Ok(())
}

fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(AssistantError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: region.to_string(),
            reason: "AWS region can only contain lowercase letters, numbers, and hyphens"
                .to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
}

impl S3Storage {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

impl Storage for S3Storage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| AssistantError::DataUnavailable {
                message: format!("Failed to read s3://{}/{}: {}", self.bucket, path, e),
            })?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| AssistantError::DataUnavailable {
                message: format!("Failed to collect S3 object body: {}", e),
            })?;

        Ok(data.into_bytes().to_vec())
    }
}
