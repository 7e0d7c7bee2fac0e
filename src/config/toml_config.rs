use crate::core::ConfigProvider;
use crate::utils::error::{CaseApiError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub queue: QueueConfig,
    pub publisher: PublisherConfig,
    pub data: Option<DataConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    pub events_exchange: String,
    pub fulfilment_event_routing_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    pub endpoint: String,
    pub vhost: Option<String>,
    pub username: String,
    pub password: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub fixture_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: Option<String>,
}

impl PublisherConfig {
    pub fn vhost(&self) -> &str {
        self.vhost.as_deref().unwrap_or("/")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(10))
    }
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CaseApiError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration after substituting `${VAR}` references.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CaseApiError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    // unset variables are left as written
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("queue.events_exchange", &self.queue.events_exchange)?;
        validation::validate_non_empty_string(
            "queue.fulfilment_event_routing_key",
            &self.queue.fulfilment_event_routing_key,
        )?;

        validation::validate_url("publisher.endpoint", &self.publisher.endpoint)?;
        validation::validate_non_empty_string("publisher.username", &self.publisher.username)?;
        if let Some(timeout) = self.publisher.timeout_seconds {
            validation::validate_positive_number("publisher.timeout_seconds", timeout, 1)?;
        }

        if let Some(data) = &self.data {
            validation::validate_path("data.fixture_path", &data.fixture_path)?;
            validation::validate_file_extension("data.fixture_path", &data.fixture_path, &["json"])?;
        }

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            if LogFormat::from_name(format).is_none() {
                return Err(CaseApiError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.to_string(),
                    reason: "Unsupported format. Valid formats: compact, json".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn fixture_path(&self) -> Result<&str> {
        validation::validate_required_field("data", &self.data).map(|d| d.fixture_path.as_str())
    }

    pub fn log_format(&self) -> LogFormat {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .and_then(LogFormat::from_name)
            .unwrap_or_default()
    }
}

impl ConfigProvider for TomlConfig {
    fn events_exchange(&self) -> &str {
        &self.queue.events_exchange
    }

    fn fulfilment_event_routing_key(&self) -> &str {
        &self.queue.fulfilment_event_routing_key
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
