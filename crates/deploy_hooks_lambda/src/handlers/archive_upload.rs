use std::fs;
use std::path::Path;

use deploy_hooks_core::archive::{archive_directory, validate_archive_key, ArchiveSummary};
use deploy_hooks_core::contract::ArchiveRequest;

use crate::adapters::object_store::ObjectStore;
use crate::error::DeployHookError;

const COMPONENT: &str = "archive_upload";
const SCRATCH_PREFIX: &str = "deploy-hooks-";

/// Zips `request.source_dir` and uploads it to `request.bucket`/`request.key`.
///
/// The key is validated before anything touches disk or the store. The
/// archive is staged in a fresh directory under `scratch_root` that is removed
/// when this returns, whether or not the upload succeeded.
pub fn archive_and_upload(
    request: &ArchiveRequest,
    store: &impl ObjectStore,
    scratch_root: &Path,
) -> Result<ArchiveSummary, DeployHookError> {
    let file_name = validate_archive_key(&request.key)?;

    let scratch = tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .tempdir_in(scratch_root)
        .map_err(|source| DeployHookError::LocalIo {
            path: scratch_root.to_path_buf(),
            source,
        })?;
    let archive_path = scratch.path().join(file_name);

    let summary = archive_directory(&request.source_dir, &archive_path)?;
    tracing::info!(
        component = COMPONENT,
        event = "archive_created",
        source_dir = %request.source_dir.display(),
        files = summary.files,
        directories = summary.directories,
        size_bytes = summary.size_bytes,
        "archive created"
    );

    let body = fs::read(&archive_path).map_err(|source| DeployHookError::LocalIo {
        path: archive_path.clone(),
        source,
    })?;
    store
        .upload_object(&request.bucket, &request.key, &body)
        .map_err(|message| DeployHookError::provider("upload_object", message))?;
    tracing::info!(
        component = COMPONENT,
        event = "archive_uploaded",
        bucket = %request.bucket,
        key = %request.key,
        "archive uploaded"
    );

    Ok(summary)
}
