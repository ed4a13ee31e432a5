use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub type FileId = i64;

/// API key/secret pair exchanged once for a session token.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub key: String,
    pub secret: SecretString,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: SecretString::new(secret.into().into()),
        }
    }
}

/// Bearer token valid for one fetch invocation.
#[derive(Debug, Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::new(token.into().into()))
    }
}

impl ExposeSecret<str> for SessionToken {
    fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum FolderType {
    Teams,
    #[serde(alias = "shared", alias = "Shared")]
    #[cfg_attr(feature = "cli", value(alias = "shared"))]
    Global,
}

impl FolderType {
    /// Name of the root folder on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            FolderType::Teams => "Teams",
            FolderType::Global => "Global",
        }
    }
}

impl fmt::Display for FolderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the walker reacts to a subfolder whose name does not match the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SubfolderScan {
    /// Give up at the first non-matching subfolder.
    #[default]
    FailFast,
    /// Visit every subfolder before reporting "not found".
    Exhaustive,
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// A timestamp exactly as the API sent it, plus its UTC reading when the
/// text is in a recognised format. Unrecognised values pass through as text.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiTimestamp {
    raw: String,
    parsed: Option<DateTime<Utc>>,
}

impl ApiTimestamp {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = parse_timestamp(raw.trim());
        if parsed.is_none() {
            tracing::debug!("Keeping unrecognised timestamp as text: {}", raw);
        }
        Self { raw, parsed }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn parsed(&self) -> Option<DateTime<Utc>> {
        self.parsed
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

impl From<DateTime<Utc>> for ApiTimestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self {
            raw: value.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            parsed: Some(value),
        }
    }
}

impl fmt::Display for ApiTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parsed {
            Some(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => f.write_str(&self.raw),
        }
    }
}

impl Serialize for ApiTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ApiTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(text) => Ok(Self::parse(text)),
            other => Ok(Self {
                raw: other.to_string(),
                parsed: None,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub folder_id: i64,
    #[serde(default)]
    pub folder_name: String,
    #[serde(default)]
    pub folder_desc: Option<String>,
    #[serde(default)]
    pub last_updated_at: Option<ApiTimestamp>,
    #[serde(default)]
    pub sub_folders: Vec<Folder>,
    #[serde(default)]
    pub files: Vec<FileMeta>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    pub file_id: FileId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub uploaded_at: Option<ApiTimestamp>,
    /// `None` until the file has been audited.
    #[serde(default)]
    pub last_audit_at: Option<ApiTimestamp>,
    #[serde(default)]
    pub last_audit_result: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publisher {
    pub name: Option<String>,
    pub number: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub publisher: Publisher,
    pub risk_rating: Option<f64>,
    pub total_compliant: i64,
    pub total_non_compliant: i64,
    pub total_advice: i64,
    pub total_unknown: i64,
}

/// An audited file together with the subfolder it was found in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedFileMeta {
    pub folder_id: i64,
    pub folder_name: String,
    pub folder_desc: Option<String>,
    pub folder_last_updated_at: Option<ApiTimestamp>,
    pub file_id: FileId,
    pub file_name: String,
    pub file_size: Option<f64>,
    pub file_uploaded_at: Option<ApiTimestamp>,
    pub file_last_audit_at: Option<ApiTimestamp>,
    pub file_overall_compliance_result: Option<String>,
}

impl MergedFileMeta {
    pub fn from_parts(folder: &Folder, file: &FileMeta) -> Self {
        Self {
            folder_id: folder.folder_id,
            folder_name: folder.folder_name.clone(),
            folder_desc: folder.folder_desc.clone(),
            folder_last_updated_at: folder.last_updated_at.clone(),
            file_id: file.file_id,
            file_name: file.name.clone(),
            file_size: file.size,
            file_uploaded_at: file.uploaded_at.clone(),
            file_last_audit_at: file.last_audit_at.clone(),
            file_overall_compliance_result: file.last_audit_result.clone(),
        }
    }
}

/// One ingested row. Field order and names follow the published schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRow {
    pub folder_id: i64,
    pub folder_name: String,
    pub folder_desc: Option<String>,
    pub folder_last_updated_at: Option<ApiTimestamp>,
    pub file_id: FileId,
    pub file_name: String,
    pub file_size: Option<f64>,
    pub file_uploaded_at: Option<ApiTimestamp>,
    pub file_last_audit_at: Option<ApiTimestamp>,
    pub file_overall_compliance_result: Option<String>,
    pub file_risk_rating: Option<f64>,
    pub file_financial_adviser: Option<String>,
    pub file_financial_adviser_id: Option<i64>,
    pub file_total_compliant: i64,
    pub file_total_non_compliant: i64,
    pub file_total_unknown: i64,
    pub file_total_advice: i64,
}

impl OutputRow {
    pub fn combine(meta: MergedFileMeta, audit: AuditResult) -> Self {
        Self {
            folder_id: meta.folder_id,
            folder_name: meta.folder_name,
            folder_desc: meta.folder_desc,
            folder_last_updated_at: meta.folder_last_updated_at,
            file_id: meta.file_id,
            file_name: meta.file_name,
            file_size: meta.file_size,
            file_uploaded_at: meta.file_uploaded_at,
            file_last_audit_at: meta.file_last_audit_at,
            file_overall_compliance_result: meta.file_overall_compliance_result,
            file_risk_rating: audit.risk_rating,
            file_financial_adviser: audit.publisher.name,
            file_financial_adviser_id: audit.publisher.number,
            file_total_compliant: audit.total_compliant,
            file_total_non_compliant: audit.total_non_compliant,
            file_total_unknown: audit.total_unknown,
            file_total_advice: audit.total_advice,
        }
    }
}

/// Output of the walk stage: metadata and the ids to request, in the same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditedFiles {
    pub files: Vec<MergedFileMeta>,
    pub file_ids: Vec<FileId>,
}

/// Everything fetched from the API for one invocation.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub files: Vec<MergedFileMeta>,
    pub audit_results: Vec<AuditResult>,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub rows: Vec<OutputRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionStatus {
    Success { rows: usize },
    Failed { message: String },
}

impl CompletionStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, CompletionStatus::Success { .. })
    }
}
