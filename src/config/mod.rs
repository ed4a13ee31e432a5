#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::http::{PRODUCTION_BASE_URL, STAGING_BASE_URL};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ARCHIVE_NAME: &str = "audit_feed.zip";
pub const MAX_TIMEOUT_SECONDS: u64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ApiEnvironment {
    #[default]
    Production,
    /// Free of usage charges.
    Staging,
}

impl ApiEnvironment {
    pub fn base_url(&self) -> &'static str {
        match self {
            ApiEnvironment::Production => PRODUCTION_BASE_URL,
            ApiEnvironment::Staging => STAGING_BASE_URL,
        }
    }
}
