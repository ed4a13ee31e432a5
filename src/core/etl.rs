use crate::core::{CompletionStatus, Pipeline, TableConnector};
use crate::domain::model::OutputRow;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline, T: TableConnector> {
    pipeline: P,
    connector: T,
}

impl<P: Pipeline, T: TableConnector> EtlEngine<P, T> {
    pub fn new(pipeline: P, connector: T) -> Self {
        Self {
            pipeline,
            connector,
        }
    }

    pub fn connector(&self) -> &T {
        &self.connector
    }

    /// Register the table schema without fetching any data.
    pub async fn describe(&self) -> Result<()> {
        self.connector.register_schema(&self.pipeline.schema()).await
    }

    /// Fetch, merge and deliver rows. `done` reaches the connector exactly
    /// once on every path.
    pub async fn run(&self) -> Result<usize> {
        tracing::info!("Starting audit feed");
        let started = Instant::now();

        match self.deliver().await {
            Ok(count) => {
                self.connector
                    .done(CompletionStatus::Success { rows: count })
                    .await?;
                tracing::info!("✅ Delivered {} rows in {:?}", count, started.elapsed());
                Ok(count)
            }
            Err(e) => {
                tracing::error!("❌ Audit feed failed: {}", e);
                if let Err(done_err) = self
                    .connector
                    .done(CompletionStatus::Failed {
                        message: e.to_string(),
                    })
                    .await
                {
                    tracing::warn!("Connector failed to record completion: {}", done_err);
                }
                Err(e)
            }
        }
    }

    async fn deliver(&self) -> Result<usize> {
        self.describe().await?;
        let rows = self.fetch_rows().await?;
        let count = rows.len();
        self.connector.append_rows(rows).await?;
        Ok(count)
    }

    async fn fetch_rows(&self) -> Result<Vec<OutputRow>> {
        tracing::debug!("Extracting...");
        let extraction = self.pipeline.extract().await?;

        tracing::debug!(
            "Transforming {} files / {} results...",
            extraction.files.len(),
            extraction.audit_results.len()
        );
        let transformed = self.pipeline.transform(extraction).await?;
        Ok(transformed.rows)
    }
}
