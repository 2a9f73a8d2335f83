use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error;

pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const ACCESS_TOKEN_ENV: &str = "CONTENT_API_ACCESS_TOKEN";

static PROCEDURE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .expect("procedure name pattern is valid")
});

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CommonConfig {
    pub project_name: String,
    pub database_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContentApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
    /// Page size hint sent as `maxResults`; the service picks its own when absent.
    #[serde(default)]
    pub max_results: Option<u32>,
}

impl Default for ContentApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: String::new(),
            timeout_secs: default_request_timeout(),
            max_results: None,
        }
    }
}

/// When an order gets acknowledged relative to its line items.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AcknowledgeMode {
    /// Once, after every line item of the order went through the persister.
    #[default]
    PerOrder,
    /// After each line item. Orders with several items get acknowledged repeatedly.
    PerLineItem,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OperationIdKind {
    /// Process-local counter starting at zero. Collides across restarts.
    Sequential,
    #[default]
    Random,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SyncConfig {
    pub merchant_id: u64,
    #[serde(default)]
    pub acknowledge_mode: AcknowledgeMode,
    #[serde(default)]
    pub operation_ids: OperationIdKind,
    #[serde(default)]
    pub wait_for_keypress: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PersisterConfig {
    #[serde(default = "default_procedure")]
    pub procedure: String,
    #[serde(default = "default_procedure_timeout")]
    pub timeout_secs: u64,
}

impl Default for PersisterConfig {
    fn default() -> Self {
        Self {
            procedure: default_procedure(),
            timeout_secs: default_procedure_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    pub common: CommonConfig,
    #[serde(default)]
    pub content_api: ContentApiConfig,
    pub sync: SyncConfig,
    #[serde(default)]
    pub persister: PersisterConfig,
}

impl Config {
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = config_path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut config = Self::from_yaml(&contents)?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(contents)?)
    }

    /// Secrets usually live in the environment (or `.env`) rather than the YAML files.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            if !url.is_empty() {
                tracing::debug!("Using database url from {}", DATABASE_URL_ENV);
                self.common.database_url = url;
            }
        }
        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
            if !token.is_empty() {
                tracing::debug!("Using access token from {}", ACCESS_TOKEN_ENV);
                self.content_api.access_token = token;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync.merchant_id == 0 {
            return Err(ConfigError::Invalid("sync.merchant_id must be set".to_string()));
        }
        if !is_valid_procedure_name(&self.persister.procedure) {
            return Err(ConfigError::Invalid(format!(
                "persister.procedure {:?} is not a plain identifier",
                self.persister.procedure
            )));
        }
        if self.persister.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "persister.timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Procedure names are spliced into the `CALL` statement, so only bare identifiers pass.
pub fn is_valid_procedure_name(name: &str) -> bool {
    PROCEDURE_NAME.is_match(name)
}

fn default_base_url() -> String {
    "https://shoppingcontent.googleapis.com/content/v2.1".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_procedure() -> String {
    "ins_google_order_dump".to_string()
}

fn default_procedure_timeout() -> u64 {
    100
}
