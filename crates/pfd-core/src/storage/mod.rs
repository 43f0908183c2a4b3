//! Persisting reassembled files.
//!
//! Bytes go to `<name>.part` first and are renamed over the final name, so a
//! failed write never leaves a half-written file under the real name.
//! Existing files with the same name are overwritten.

use crate::error::DownloadError;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `file.iso` → `file.iso.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

fn fail(path: &Path) -> impl FnOnce(std::io::Error) -> DownloadError {
    let path = path.to_path_buf();
    move |source| DownloadError::Persistence { path, source }
}

/// Writes `bytes` to `dir/file_name` and returns the final path.
pub async fn persist(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError> {
    let final_path = dir.join(file_name);
    let tp = temp_path(&final_path);
    tokio::fs::create_dir_all(dir).await.map_err(fail(dir))?;

    let written = match tokio::fs::write(&tp, bytes).await {
        Ok(()) => tokio::fs::rename(&tp, &final_path)
            .await
            .map_err(fail(&final_path)),
        Err(e) => Err(fail(&tp)(e)),
    };
    if written.is_err() {
        // Leave no `.part` behind; the first error is the one reported.
        let _ = tokio::fs::remove_file(&tp).await;
    }
    written?;

    tracing::debug!(path = %final_path.display(), bytes = bytes.len(), "file persisted");
    Ok(final_path)
}
