//! File persistence helpers.
//!
//! Every export is written to a sibling temp file and renamed into place,
//! so an interrupted run never leaves a partial output file behind.

use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::StoreError;

// ============================================================================
// File Operations
// ============================================================================

/// Temp path used while writing `path`: `<name>.tmp` in the same directory.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes bytes atomically (temp file + rename).
pub async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    debug!(path = %path.display(), bytes = contents.len(), "Writing file");

    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }

    let temp_path = temp_path_for(path);
    if let Err(e) = tokio::fs::write(&temp_path, contents).await {
        discard(&temp_path).await;
        return Err(e.into());
    }
    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        discard(&temp_path).await;
        return Err(e.into());
    }

    debug!(path = %path.display(), "File written");
    Ok(())
}

async fn discard(temp_path: &Path) {
    if let Err(e) = tokio::fs::remove_file(temp_path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %temp_path.display(), error = %e, "Failed to remove temp file");
        }
    }
}

/// Saves data to a pretty-printed JSON file atomically.
pub async fn save_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(data)?;
    write_atomic(path, &json).await
}

/// Ensures a directory exists.
pub async fn ensure_dir(path: &Path) -> Result<(), StoreError> {
    if path.as_os_str().is_empty() || path.exists() {
        return Ok(());
    }
    debug!(path = %path.display(), "Creating directory");
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
