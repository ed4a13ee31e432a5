use crate::domain::model::{AuditedFiles, Folder, FolderType, MergedFileMeta, SubfolderScan};
use crate::utils::error::{FeedError, Result};

/// Find `folder_type` among the root folders, then `sub_folder_name` among its
/// subfolders, and keep the files that have been audited.
///
/// With [`SubfolderScan::FailFast`] the search stops at the first subfolder
/// whose name does not match. [`SubfolderScan::Exhaustive`] visits them all.
pub fn select_audited_files(
    roots: &[Folder],
    folder_type: FolderType,
    sub_folder_name: &str,
    scan: SubfolderScan,
) -> Result<AuditedFiles> {
    let root = roots
        .iter()
        .find(|folder| folder.folder_name == folder_type.as_str())
        .ok_or_else(|| {
            FeedError::folder_walk(format!(
                "folder type \"{}\" not found in this account",
                folder_type
            ))
        })?;

    tracing::debug!(
        "Root folder '{}' has {} subfolders",
        root.folder_name,
        root.sub_folders.len()
    );

    for sub_folder in &root.sub_folders {
        if sub_folder.folder_name == sub_folder_name {
            return Ok(collect_audited(sub_folder));
        }

        if scan == SubfolderScan::FailFast {
            tracing::debug!(
                "Subfolder '{}' does not match, stopping scan",
                sub_folder.folder_name
            );
            break;
        }
    }

    Err(FeedError::folder_walk(format!(
        "subfolder \"{}\" not found under \"{}\"",
        sub_folder_name, folder_type
    )))
}

fn collect_audited(folder: &Folder) -> AuditedFiles {
    let mut audited = AuditedFiles::default();

    for file in folder.files.iter().filter(|f| f.last_audit_at.is_some()) {
        audited.files.push(MergedFileMeta::from_parts(folder, file));
        audited.file_ids.push(file.file_id);
    }

    tracing::debug!(
        "Subfolder '{}': {} of {} files audited",
        folder.folder_name,
        audited.file_ids.len(),
        folder.files.len()
    );
    audited
}
