use crate::domain::model::{
    CompletionStatus, Credentials, Extraction, FolderType, OutputRow, SubfolderScan,
    TransformResult,
};
use crate::domain::schema::TableSchema;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn credentials(&self) -> Credentials;
    fn folder_type(&self) -> FolderType;
    fn sub_folder_name(&self) -> &str;
    fn subfolder_scan(&self) -> SubfolderScan;
    fn output_path(&self) -> &str;
    fn archive_name(&self) -> &str;
    fn request_timeout_seconds(&self) -> Option<u64>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    fn schema(&self) -> TableSchema;
    async fn extract(&self) -> Result<Extraction>;
    async fn transform(&self, data: Extraction) -> Result<TransformResult>;
}

/// The host tool's tabular ingestion interface.
#[async_trait]
pub trait TableConnector: Send + Sync {
    async fn register_schema(&self, schema: &TableSchema) -> Result<()>;
    async fn append_rows(&self, rows: Vec<OutputRow>) -> Result<()>;
    async fn done(&self, status: CompletionStatus) -> Result<()>;
}
