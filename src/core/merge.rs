use crate::domain::model::{AuditResult, MergedFileMeta, OutputRow};
use crate::utils::error::{FeedError, Result};

/// Zip file metadata with audit results by position.
///
/// The audit API answers in request order without echoing the file id, so
/// equal length is the only precondition that can be checked here.
pub fn merge_rows(files: Vec<MergedFileMeta>, results: Vec<AuditResult>) -> Result<Vec<OutputRow>> {
    if files.len() != results.len() {
        return Err(FeedError::LengthMismatch {
            files: files.len(),
            results: results.len(),
        });
    }

    Ok(files
        .into_iter()
        .zip(results)
        .map(|(meta, audit)| OutputRow::combine(meta, audit))
        .collect())
}
