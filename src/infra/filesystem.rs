//! Filesystem operations
//!
//! Async file access used by the snapshot reader and writer.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::FilesystemError;

/// Whether a path exists (unreadable parents count as absent)
pub async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Create a directory and all parent directories
pub async fn create_dir_all(path: &Path) -> Result<(), FilesystemError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| FilesystemError::CreateDir {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
}

/// Write content to a file, creating parent directories
pub async fn write_file(path: &Path, content: &[u8]) -> Result<(), FilesystemError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content)
        .await
        .map_err(|e| FilesystemError::WriteFile {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
}

/// Read a whole file
pub async fn read_file(path: &Path) -> Result<Vec<u8>, FilesystemError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| FilesystemError::ReadFile {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
}

/// Modification time of a file in epoch milliseconds
pub async fn modified_millis(path: &Path) -> Result<i64, FilesystemError> {
    let metadata_error = |error: String| FilesystemError::Metadata {
        path: path.to_path_buf(),
        error,
    };

    let modified = tokio::fs::metadata(path)
        .await
        .and_then(|m| m.modified())
        .map_err(|e| metadata_error(e.to_string()))?;

    Ok(system_time_millis(modified))
}

/// Convert a `SystemTime` to epoch milliseconds (negative before the epoch)
pub fn system_time_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
        Err(before) => -i64::try_from(before.duration().as_millis()).unwrap_or(i64::MAX),
    }
}

/// Current time in epoch milliseconds
pub fn now_millis() -> i64 {
    system_time_millis(SystemTime::now())
}
