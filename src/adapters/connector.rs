use crate::domain::model::{CompletionStatus, OutputRow};
use crate::domain::ports::{Storage, TableConnector};
use crate::domain::schema::TableSchema;
use crate::utils::error::{FeedError, Result};
use async_trait::async_trait;
use std::io::Write;
use tokio::sync::Mutex;
use zip::write::{FileOptions, ZipWriter};

#[derive(Debug, Default)]
struct TableState {
    schema: Option<TableSchema>,
    rows: Vec<OutputRow>,
    completions: Vec<CompletionStatus>,
}

/// Keeps everything the pipeline hands over in memory.
#[derive(Debug, Default)]
pub struct MemoryConnector {
    state: Mutex<TableState>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn schema(&self) -> Option<TableSchema> {
        self.state.lock().await.schema.clone()
    }

    pub async fn rows(&self) -> Vec<OutputRow> {
        self.state.lock().await.rows.clone()
    }

    /// Every `done` signal received, in order.
    pub async fn completions(&self) -> Vec<CompletionStatus> {
        self.state.lock().await.completions.clone()
    }
}

#[async_trait]
impl TableConnector for MemoryConnector {
    async fn register_schema(&self, schema: &TableSchema) -> Result<()> {
        self.state.lock().await.schema = Some(schema.clone());
        Ok(())
    }

    async fn append_rows(&self, rows: Vec<OutputRow>) -> Result<()> {
        self.state.lock().await.rows.extend(rows);
        Ok(())
    }

    async fn done(&self, status: CompletionStatus) -> Result<()> {
        self.state.lock().await.completions.push(status);
        Ok(())
    }
}

/// Buffers rows and, on a successful completion, writes them as one zip
/// archive holding the schema plus CSV, TSV and JSON renditions of the table.
pub struct ArchiveConnector<S: Storage> {
    storage: S,
    archive_name: String,
    state: Mutex<TableState>,
}

impl<S: Storage> ArchiveConnector<S> {
    pub fn new(storage: S, archive_name: impl Into<String>) -> Self {
        Self {
            storage,
            archive_name: archive_name.into(),
            state: Mutex::new(TableState::default()),
        }
    }

    fn build_archive(schema: &TableSchema, rows: &[OutputRow]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        zip.start_file::<_, ()>("schema.json", FileOptions::default())?;
        zip.write_all(serde_json::to_string_pretty(schema)?.as_bytes())?;

        zip.start_file::<_, ()>(format!("{}.csv", schema.id), FileOptions::default())?;
        zip.write_all(&encode_delimited(rows, b',')?)?;

        zip.start_file::<_, ()>(format!("{}.tsv", schema.id), FileOptions::default())?;
        zip.write_all(&encode_delimited(rows, b'\t')?)?;

        zip.start_file::<_, ()>(format!("{}.json", schema.id), FileOptions::default())?;
        zip.write_all(serde_json::to_string_pretty(rows)?.as_bytes())?;

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

/// Header row is always written, even for an empty table.
pub fn encode_delimited(rows: &[OutputRow], delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(crate::domain::schema::AUDIT_COLUMNS.iter().map(|c| c.id))?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| FeedError::IoError(e.into_error()))
}

#[async_trait]
impl<S: Storage> TableConnector for ArchiveConnector<S> {
    async fn register_schema(&self, schema: &TableSchema) -> Result<()> {
        tracing::debug!(
            "Registered table '{}' with {} columns",
            schema.id,
            schema.columns.len()
        );
        self.state.lock().await.schema = Some(schema.clone());
        Ok(())
    }

    async fn append_rows(&self, rows: Vec<OutputRow>) -> Result<()> {
        self.state.lock().await.rows.extend(rows);
        Ok(())
    }

    async fn done(&self, status: CompletionStatus) -> Result<()> {
        let (schema, rows) = {
            let mut state = self.state.lock().await;
            state.completions.push(status.clone());
            (state.schema.clone(), std::mem::take(&mut state.rows))
        };

        if let CompletionStatus::Failed { message } = status {
            tracing::warn!("Nothing written, fetch failed: {}", message);
            return Ok(());
        }

        let schema = schema.ok_or_else(|| FeedError::ConfigError {
            message: "done signalled before a schema was registered".to_string(),
        })?;

        let archive = Self::build_archive(&schema, &rows)?;
        tracing::debug!("Writing archive ({} bytes) to storage", archive.len());
        self.storage.write_file(&self.archive_name, &archive).await?;

        tracing::info!("📦 Wrote {} rows to {}", rows.len(), self.archive_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AuditResult, MergedFileMeta, Publisher};
    use crate::domain::schema::audit_table_schema;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use std::io::Read;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().await.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files
                .lock()
                .await
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn row(file_id: i64, adviser: &str) -> OutputRow {
        OutputRow::combine(
            MergedFileMeta {
                folder_id: 20,
                folder_name: "A Team".to_string(),
                folder_desc: Some("Advice team".to_string()),
                folder_last_updated_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap().into()),
                file_id,
                file_name: format!("{}.pdf", file_id),
                file_size: Some(512.0),
                file_uploaded_at: None,
                file_last_audit_at: Some(Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap().into()),
                file_overall_compliance_result: Some("Compliant".to_string()),
            },
            AuditResult {
                publisher: Publisher {
                    name: Some(adviser.to_string()),
                    number: Some(42),
                },
                risk_rating: Some(1.5),
                total_compliant: 9,
                total_non_compliant: 0,
                total_advice: 1,
                total_unknown: 0,
            },
        )
    }

    fn read_entry(archive: &[u8], name: &str) -> String {
        let mut zip = zip::ZipArchive::new(std::io::Cursor::new(archive.to_vec())).unwrap();
        let mut file = zip.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_csv_header_matches_schema() {
        let bytes = encode_delimited(&[row(10, "Jane, Citizen")], b',').unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        let ids: Vec<&str> = crate::domain::schema::AUDIT_COLUMNS
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(header, ids.join(","));

        let data = lines.next().unwrap();
        assert!(data.starts_with("20,A Team,Advice team,2024-05-01T09:30:00Z,10,10.pdf,512.0,"));
        assert!(data.contains("\"Jane, Citizen\""));
    }

    #[tokio::test]
    async fn test_archive_written_on_success() {
        let storage = MockStorage::default();
        let connector = ArchiveConnector::new(storage.clone(), "audit.zip");

        connector
            .register_schema(&audit_table_schema("A Team"))
            .await
            .unwrap();
        connector
            .append_rows(vec![row(10, "Jane"), row(11, "John")])
            .await
            .unwrap();
        connector
            .done(CompletionStatus::Success { rows: 2 })
            .await
            .unwrap();

        let archive = storage.get_file("audit.zip").await.unwrap();
        let tsv = read_entry(&archive, "TIQKdata.tsv");
        assert_eq!(tsv.lines().count(), 3);
        assert!(tsv.lines().next().unwrap().starts_with("folderId\tfolderName"));

        let json: serde_json::Value =
            serde_json::from_str(&read_entry(&archive, "TIQKdata.json")).unwrap();
        assert_eq!(json[1]["fileId"], 11);
        assert_eq!(json[1]["fileFinancialAdviser"], "John");

        let schema: serde_json::Value =
            serde_json::from_str(&read_entry(&archive, "schema.json")).unwrap();
        assert_eq!(schema["columns"].as_array().unwrap().len(), 17);
        assert_eq!(schema["connectionName"], "TIQK data feed");
    }

    #[tokio::test]
    async fn test_archive_skipped_on_failure() {
        let storage = MockStorage::default();
        let connector = ArchiveConnector::new(storage.clone(), "audit.zip");

        connector
            .register_schema(&audit_table_schema("A Team"))
            .await
            .unwrap();
        connector
            .done(CompletionStatus::Failed {
                message: "auth".to_string(),
            })
            .await
            .unwrap();

        assert!(storage.get_file("audit.zip").await.is_none());
    }

    #[tokio::test]
    async fn test_memory_connector_records_everything() {
        let connector = MemoryConnector::new();
        connector
            .register_schema(&audit_table_schema("X"))
            .await
            .unwrap();
        connector.append_rows(vec![row(1, "A")]).await.unwrap();
        connector
            .done(CompletionStatus::Success { rows: 1 })
            .await
            .unwrap();

        assert_eq!(connector.schema().await.unwrap().alias, "Audit results for folder: X");
        assert_eq!(connector.rows().await.len(), 1);
        assert_eq!(
            connector.completions().await,
            vec![CompletionStatus::Success { rows: 1 }]
        );
    }
}
