use crate::core::walker::select_audited_files;
use crate::domain::model::{
    AuditResult, AuditedFiles, Credentials, FileId, Folder, FolderType, SessionToken,
    SubfolderScan,
};
use crate::utils::error::{FeedError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::time::Duration;

pub const PRODUCTION_BASE_URL: &str = "https://public-api.tiqk.io";
/// Not billed; the account has to be enabled for it first.
pub const STAGING_BASE_URL: &str = "https://stage-api.tiqk.io";
pub const API_VERSION: &str = "v1";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
}

/// Client for the three audit API calls. Holds no session state; the token
/// is passed into every authenticated call.
#[derive(Debug, Clone)]
pub struct AuditApiClient {
    base_url: String,
    client: Client,
}

impl AuditApiClient {
    pub fn new(base_url: &str, timeout_seconds: Option<u64>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, API_VERSION, path)
    }

    /// Exchange the key/secret pair for a bearer token.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<SessionToken> {
        let url = self.endpoint("oauth/token");
        tracing::debug!("Requesting token from: {}", url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&credentials.key, Some(credentials.secret.expose_secret()))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| FeedError::auth(e.to_string()))?;

        let body = read_success_body(response)
            .await
            .map_err(|message| FeedError::AuthError { message })?;

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| FeedError::auth(format!("{} (body: {})", e, body)))?;

        match parsed.token {
            Some(token) if !token.is_empty() => Ok(SessionToken::new(token)),
            _ => Err(FeedError::auth(body)),
        }
    }

    /// The complete folder tree with file listings inlined.
    pub async fn fetch_folders(&self, token: &SessionToken) -> Result<Vec<Folder>> {
        let url = self.endpoint("folders");
        tracing::debug!("Requesting folder tree from: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("includeFiles", "true")])
            .bearer_auth(token.expose_secret())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| FeedError::fetch("folders", e.to_string()))?;

        let body = read_success_body(response)
            .await
            .map_err(|message| FeedError::fetch("folders", message))?;

        serde_json::from_str(&body)
            .map_err(|e| FeedError::fetch("folders", format!("invalid folder tree: {}", e)))
    }

    pub async fn list_audited_files(
        &self,
        token: &SessionToken,
        folder_type: FolderType,
        sub_folder_name: &str,
        scan: SubfolderScan,
    ) -> Result<AuditedFiles> {
        let roots = self.fetch_folders(token).await?;
        tracing::debug!("Fetched {} root folders", roots.len());
        select_audited_files(&roots, folder_type, sub_folder_name, scan)
    }

    /// One batched request; the API answers in the order of `file_ids`.
    pub async fn fetch_audit_results(
        &self,
        token: &SessionToken,
        file_ids: &[FileId],
    ) -> Result<Vec<AuditResult>> {
        if file_ids.is_empty() {
            tracing::debug!("No audited files, skipping audit results request");
            return Ok(Vec::new());
        }

        let ids = file_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let url = self.endpoint(&format!("audit/results/{}", ids));
        tracing::debug!("Requesting audit results for {} files", file_ids.len());

        let response = self
            .client
            .get(&url)
            .bearer_auth(token.expose_secret())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| FeedError::fetch("audit results", e.to_string()))?;

        let body = read_success_body(response)
            .await
            .map_err(|message| FeedError::fetch("audit results", message))?;

        serde_json::from_str(&body).map_err(|e| {
            FeedError::fetch("audit results", format!("invalid audit results: {}", e))
        })
    }
}

/// Body of a 2xx response, or the raw body (with status) of anything else.
async fn read_success_body(response: Response) -> std::result::Result<String, String> {
    let status = response.status();
    tracing::debug!("API response status: {}", status);

    let body = response.text().await.map_err(|e| e.to_string())?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(format!("HTTP {}: {}", status.as_u16(), body))
    }
}
