pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::toml_config::TomlConfig;

pub use adapters::connector::{ArchiveConnector, MemoryConnector};
pub use adapters::http::AuditApiClient;
pub use adapters::storage::LocalStorage;
pub use core::{etl::EtlEngine, pipeline::AuditPipeline};
pub use domain::schema::{audit_table_schema, TableSchema};
pub use utils::error::{FeedError, Result};
