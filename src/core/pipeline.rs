use crate::adapters::http::AuditApiClient;
use crate::core::merge::merge_rows;
use crate::core::{ConfigProvider, Extraction, Pipeline, TransformResult};
use crate::domain::schema::{audit_table_schema, TableSchema};
use crate::utils::error::Result;

/// Authenticate, walk the folder tree, fetch audit results, then merge.
pub struct AuditPipeline<C: ConfigProvider> {
    config: C,
    client: AuditApiClient,
}

impl<C: ConfigProvider> AuditPipeline<C> {
    pub fn new(config: C) -> Result<Self> {
        let client = AuditApiClient::new(config.api_base_url(), config.request_timeout_seconds())?;
        Ok(Self { config, client })
    }
}

#[async_trait::async_trait]
impl<C: ConfigProvider> Pipeline for AuditPipeline<C> {
    fn schema(&self) -> TableSchema {
        audit_table_schema(self.config.sub_folder_name())
    }

    async fn extract(&self) -> Result<Extraction> {
        tracing::info!("🔐 Authenticating against {}", self.client.base_url());
        let token = self.client.authenticate(&self.config.credentials()).await?;

        tracing::info!(
            "📂 Looking for subfolder '{}' under '{}'",
            self.config.sub_folder_name(),
            self.config.folder_type()
        );
        let audited = self
            .client
            .list_audited_files(
                &token,
                self.config.folder_type(),
                self.config.sub_folder_name(),
                self.config.subfolder_scan(),
            )
            .await?;
        tracing::info!("📋 Found {} audited files", audited.file_ids.len());

        let audit_results = self
            .client
            .fetch_audit_results(&token, &audited.file_ids)
            .await?;
        tracing::info!("📊 Received {} audit results", audit_results.len());

        Ok(Extraction {
            files: audited.files,
            audit_results,
        })
    }

    async fn transform(&self, data: Extraction) -> Result<TransformResult> {
        let rows = merge_rows(data.files, data.audit_results)?;
        tracing::info!("🔧 Merged {} rows", rows.len());
        Ok(TransformResult { rows })
    }
}
