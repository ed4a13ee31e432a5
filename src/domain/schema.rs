use serde::Serialize;

pub const AUDIT_TABLE_ID: &str = "TIQKdata";
/// Name the host shows for this data source.
pub const CONNECTION_NAME: &str = "TIQK data feed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int,
    String,
    Float,
    Datetime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSchema {
    pub id: &'static str,
    pub alias: &'static str,
    #[serde(rename = "dataType")]
    pub data_type: ColumnType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    pub connection_name: String,
    pub id: String,
    pub alias: String,
    pub columns: Vec<ColumnSchema>,
}

const fn column(id: &'static str, alias: &'static str, data_type: ColumnType) -> ColumnSchema {
    ColumnSchema {
        id,
        alias,
        data_type,
    }
}

/// Column order matches the field order of [`crate::domain::model::OutputRow`].
pub const AUDIT_COLUMNS: [ColumnSchema; 17] = [
    column("folderId", "Folder id", ColumnType::Int),
    column("folderName", "Folder name", ColumnType::String),
    column("folderDesc", "Folder description", ColumnType::String),
    column("folderLastUpdatedAt", "Folder last updated", ColumnType::Datetime),
    column("fileId", "File id", ColumnType::Int),
    column("fileName", "File name", ColumnType::String),
    column("fileSize", "File size", ColumnType::Float),
    column("fileUploadedAt", "File uploaded", ColumnType::Datetime),
    column("fileLastAuditAt", "File last audited", ColumnType::Datetime),
    column(
        "fileOverallComplianceResult",
        "File overall audit result",
        ColumnType::String,
    ),
    column("fileRiskRating", "File regulatory Risk Rating", ColumnType::Float),
    column(
        "fileFinancialAdviser",
        "File Financial Adviser name",
        ColumnType::String,
    ),
    column(
        "fileFinancialAdviserId",
        "File Financial Adviser ID",
        ColumnType::Int,
    ),
    column(
        "fileTotalCompliant",
        "File total (Regulatory) Compliant attributes",
        ColumnType::Int,
    ),
    column(
        "fileTotalNonCompliant",
        "File total (Regulatory) Non-compliant attributes",
        ColumnType::Int,
    ),
    column(
        "fileTotalUnknown",
        "File total (Regulatory) Unknown attributes",
        ColumnType::Int,
    ),
    column(
        "fileTotalAdvice",
        "File total (Regulatory) Advice attributes",
        ColumnType::Int,
    ),
];

/// The table description handed to the host before any data flows.
pub fn audit_table_schema(sub_folder_name: &str) -> TableSchema {
    TableSchema {
        connection_name: CONNECTION_NAME.to_string(),
        id: AUDIT_TABLE_ID.to_string(),
        alias: format!("Audit results for folder: {}", sub_folder_name),
        columns: AUDIT_COLUMNS.to_vec(),
    }
}
