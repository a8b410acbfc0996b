use crate::adapters::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::core::engine::DEFAULT_GREETING;
use crate::core::fuzzy::MatchAlgorithm;
use crate::core::orchestrator::{DEFAULT_GENERAL_THRESHOLD, DEFAULT_STAFF_THRESHOLD};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{AssistantError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_required_field, validate_url,
    Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Every section is optional; an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default)]
    pub assistant: AssistantSection,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub generalist: GeneralistConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSection {
    pub college_name: String,
    pub greeting: String,
}

impl Default for AssistantSection {
    fn default() -> Self {
        Self {
            college_name: "Kisan College".to_string(),
            greeting: DEFAULT_GREETING.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub path: String,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: "data.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub algorithm: MatchAlgorithm,
    pub staff_threshold: f64,
    pub general_threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            algorithm: MatchAlgorithm::default(),
            staff_threshold: DEFAULT_STAFF_THRESHOLD,
            general_threshold: DEFAULT_GENERAL_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralistConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Replaces the persona prompt built from the college name.
    pub system_prompt: Option<String>,
}

impl Default for GeneralistConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 30,
            system_prompt: None,
        }
    }
}

impl GeneralistConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Configured key, else `GEMINI_API_KEY`. Absent is a fatal configuration error.
    pub fn api_key(&self) -> Result<String> {
        self.resolve_api_key(std::env::var(API_KEY_ENV).ok())
    }

    fn resolve_api_key(&self, from_env: Option<String>) -> Result<String> {
        let key = self
            .api_key
            .clone()
            .or(from_env)
            .filter(|key| !key.trim().is_empty() && !is_placeholder(key));
        validate_required_field("generalist.api_key", &key).cloned()
    }
}

fn placeholder_pattern() -> Result<Regex> {
    Regex::new(r"\$\{([^}]+)\}").map_err(|e| AssistantError::ConfigError {
        message: format!("invalid placeholder pattern: {}", e),
    })
}

fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.starts_with("${") && trimmed.ends_with('}')
}

impl AssistantConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AssistantError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;

        let mut config: Self =
            toml::from_str(&processed).map_err(|e| AssistantError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        // An unset `${VAR}` survives substitution; treat it as not configured.
        if config.generalist.api_key.as_deref().is_some_and(is_placeholder) {
            config.generalist.api_key = None;
        }
        Ok(config)
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = placeholder_pattern()?;
        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });
        Ok(result.to_string())
    }

    pub fn with_knowledge_path(mut self, path: impl Into<String>) -> Self {
        self.knowledge.path = path.into();
        self
    }
}

impl ConfigProvider for AssistantConfig {
    fn college_name(&self) -> &str {
        &self.assistant.college_name
    }

    fn greeting(&self) -> &str {
        &self.assistant.greeting
    }

    fn knowledge_path(&self) -> &str {
        &self.knowledge.path
    }

    fn matching(&self) -> &MatchingConfig {
        &self.matching
    }

    fn generalist(&self) -> &GeneralistConfig {
        &self.generalist
    }
}

impl Validate for AssistantConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("assistant.college_name", &self.assistant.college_name)?;
        validate_non_empty_string("assistant.greeting", &self.assistant.greeting)?;
        validate_path("knowledge.path", &self.knowledge.path)?;
        validate_range("matching.staff_threshold", self.matching.staff_threshold, 0.0, 1.0)?;
        validate_range("matching.general_threshold", self.matching.general_threshold, 0.0, 1.0)?;
        validate_non_empty_string("generalist.model", &self.generalist.model)?;
        validate_url("generalist.base_url", &self.generalist.base_url)?;
        validate_range("generalist.timeout_seconds", self.generalist.timeout_seconds, 1, 300)?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AssistantConfig::from_toml_str("").unwrap();
        assert_eq!(config.college_name(), "Kisan College");
        assert_eq!(config.greeting(), DEFAULT_GREETING);
        assert_eq!(config.knowledge_path(), "data.json");
        assert_eq!(config.matching().algorithm, MatchAlgorithm::SequenceRatio);
        assert_eq!(config.matching().staff_threshold, 0.7);
        assert_eq!(config.matching().general_threshold, 0.6);
        assert_eq!(config.generalist().model, "gemini-1.5-flash-latest");
        assert_eq!(config.generalist().timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[assistant]
college_name = "Test College"

[knowledge]
path = "campus/data.json"

[matching]
algorithm = "jaro_winkler"
general_threshold = 0.8

[generalist]
api_key = "literal-key"
model = "gemini-pro"
timeout_seconds = 5
"#;
        let config = AssistantConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.college_name(), "Test College");
        assert_eq!(config.greeting(), DEFAULT_GREETING);
        assert_eq!(config.knowledge_path(), "campus/data.json");
        assert_eq!(config.matching().algorithm, MatchAlgorithm::JaroWinkler);
        assert_eq!(config.matching().staff_threshold, 0.7);
        assert_eq!(config.matching().general_threshold, 0.8);
        assert_eq!(config.generalist().api_key().unwrap(), "literal-key");
        assert_eq!(config.generalist().base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CAMPUS_TEST_SUBST_KEY", "from-env-123");
        let config = AssistantConfig::from_toml_str(
            r#"
[generalist]
api_key = "${CAMPUS_TEST_SUBST_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(config.generalist.api_key.as_deref(), Some("from-env-123"));
        std::env::remove_var("CAMPUS_TEST_SUBST_KEY");
    }

    #[test]
    fn test_unresolved_placeholder_is_absent() {
        let config = AssistantConfig::from_toml_str(
            r#"
[generalist]
api_key = "${CAMPUS_TEST_DEFINITELY_UNSET}"
"#,
        )
        .unwrap();
        assert!(config.generalist.api_key.is_none());

        let err = config.generalist.resolve_api_key(None).unwrap_err();
        assert!(matches!(
            err,
            AssistantError::MissingConfigError { ref field } if field == "generalist.api_key"
        ));
        assert_eq!(
            config
                .generalist
                .resolve_api_key(Some("env-key".to_string()))
                .unwrap(),
            "env-key"
        );
    }

    #[test]
    fn test_blank_key_is_missing() {
        let generalist = GeneralistConfig {
            api_key: Some("  ".to_string()),
            ..GeneralistConfig::default()
        };
        assert!(generalist.resolve_api_key(None).is_err());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AssistantConfig::default();
        config.matching.general_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = AssistantConfig::default();
        config.generalist.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = AssistantConfig::default();
        config.generalist.timeout_seconds = 0;
        assert!(config.validate().is_err());

        let config = AssistantConfig::default().with_knowledge_path("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_reported() {
        let err = AssistantConfig::from_toml_str("[matching\nalgorithm = 1").unwrap_err();
        assert!(matches!(err, AssistantError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[knowledge]\npath = \"/srv/campus.json\"\n")
            .unwrap();

        let config = AssistantConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.knowledge_path(), "/srv/campus.json");
    }
}
