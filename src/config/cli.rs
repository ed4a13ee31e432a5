use crate::config::{ApiEnvironment, DEFAULT_ARCHIVE_NAME, MAX_TIMEOUT_SECONDS};
use crate::core::ConfigProvider;
use crate::domain::model::{Credentials, FolderType, SubfolderScan};
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_secret, validate_url,
    Validate,
};
use clap::Parser;
use secrecy::{ExposeSecret, SecretString};
use std::convert::Infallible;
use std::path::PathBuf;

fn parse_secret(value: &str) -> std::result::Result<SecretString, Infallible> {
    Ok(SecretString::new(value.into()))
}

#[derive(Debug, Clone, Parser)]
#[command(name = "audit-feed")]
#[command(about = "Export audit results for one folder of the audit API as a table")]
pub struct CliConfig {
    /// Load settings from a TOML file instead of flags
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, env = "AUDIT_FEED_ENVIRONMENT", default_value = "production")]
    pub environment: ApiEnvironment,

    /// Overrides the environment's base URL
    #[arg(long, env = "AUDIT_FEED_BASE_URL")]
    pub base_url: Option<String>,

    #[arg(long, env = "AUDIT_FEED_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(
        long,
        env = "AUDIT_FEED_API_SECRET",
        hide_env_values = true,
        value_parser = parse_secret
    )]
    pub api_secret: Option<SecretString>,

    #[arg(long, value_enum, env = "AUDIT_FEED_FOLDER_TYPE", default_value = "teams")]
    pub folder_type: FolderType,

    #[arg(long, env = "AUDIT_FEED_SUBFOLDER")]
    pub sub_folder_name: Option<String>,

    #[arg(long, value_enum, default_value = "fail-fast")]
    pub subfolder_scan: SubfolderScan,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_ARCHIVE_NAME)]
    pub archive_name: String,

    /// Request timeout; the HTTP client default applies when unset
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Print the table schema as JSON and exit
    #[arg(long)]
    pub schema_only: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,
}

impl ConfigProvider for CliConfig {
    fn api_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
    }

    fn credentials(&self) -> Credentials {
        Credentials {
            key: self.api_key.clone().unwrap_or_default(),
            secret: self
                .api_secret
                .clone()
                .unwrap_or_else(|| SecretString::new("".into())),
        }
    }

    fn folder_type(&self) -> FolderType {
        self.folder_type
    }

    fn sub_folder_name(&self) -> &str {
        self.sub_folder_name.as_deref().unwrap_or_default()
    }

    fn subfolder_scan(&self) -> SubfolderScan {
        self.subfolder_scan
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn archive_name(&self) -> &str {
        &self.archive_name
    }

    fn request_timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", self.api_base_url())?;
        validate_secret("api_key", self.api_key.as_deref().unwrap_or_default())?;
        validate_secret(
            "api_secret",
            self.api_secret
                .as_ref()
                .map(|secret| secret.expose_secret())
                .unwrap_or_default(),
        )?;
        validate_non_empty_string("sub_folder_name", self.sub_folder_name())?;
        validate_path("output_path", &self.output_path)?;
        validate_path("archive_name", &self.archive_name)?;
        if let Some(timeout) = self.timeout_seconds {
            validate_range("timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }
        Ok(())
    }
}
