use crate::config::{ApiEnvironment, DEFAULT_ARCHIVE_NAME, MAX_TIMEOUT_SECONDS};
use crate::core::ConfigProvider;
use crate::domain::model::{Credentials, FolderType, SubfolderScan};
use crate::utils::error::{FeedError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_secret, validate_url,
    Validate,
};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    pub api: ApiConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub environment: ApiEnvironment,
    pub base_url: Option<String>,
    pub key: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub secret: SecretString,
    pub timeout_seconds: Option<u64>,
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    let plain = String::deserialize(deserializer)?;
    Ok(SecretString::new(plain.into()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub folder_type: FolderType,
    pub sub_folder_name: String,
    #[serde(default)]
    pub subfolder_scan: SubfolderScan,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_archive_name")]
    pub archive_name: String,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            archive_name: default_archive_name(),
        }
    }
}

fn default_output_path() -> String {
    "./output".to_string()
}

fn default_archive_name() -> String {
    DEFAULT_ARCHIVE_NAME.to_string()
}

fn env_placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex"))
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FeedError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| FeedError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value. Unset variables are left
    /// as-is so validation can name the field that is missing.
    fn substitute_env_vars(content: &str) -> String {
        env_placeholder()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| caps[0].to_string())
            })
            .into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn api_base_url(&self) -> &str {
        self.api
            .base_url
            .as_deref()
            .unwrap_or_else(|| self.api.environment.base_url())
    }

    fn credentials(&self) -> Credentials {
        Credentials {
            key: self.api.key.clone(),
            secret: self.api.secret.clone(),
        }
    }

    fn folder_type(&self) -> FolderType {
        self.source.folder_type
    }

    fn sub_folder_name(&self) -> &str {
        &self.source.sub_folder_name
    }

    fn subfolder_scan(&self) -> SubfolderScan {
        self.source.subfolder_scan
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn archive_name(&self) -> &str {
        &self.load.archive_name
    }

    fn request_timeout_seconds(&self) -> Option<u64> {
        self.api.timeout_seconds
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", self.api_base_url())?;
        validate_secret("api.key", &self.api.key)?;
        validate_secret("api.secret", self.api.secret.expose_secret())?;
        validate_non_empty_string("source.sub_folder_name", &self.source.sub_folder_name)?;
        validate_path("load.output_path", &self.load.output_path)?;
        validate_path("load.archive_name", &self.load.archive_name)?;
        if let Some(timeout) = self.api.timeout_seconds {
            validate_range("api.timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }
        Ok(())
    }
}
