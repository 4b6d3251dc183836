use crate::error::PowerSyncError;
use log::info;
use std::error::Error;
use std::io;
use std::path::Path;

/// Creates `path` (and its parents) unless it already is a directory.
pub async fn ensure_dir_exists(path: &Path) -> Result<(), PowerSyncError> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(PowerSyncError::NotADirectory(path.to_path_buf()));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating directory: {}", path.display());
            tokio::fs::create_dir_all(path)
                .await
                .map_err(|e| PowerSyncError::DirCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(PowerSyncError::DirCreation(path.to_path_buf(), e)),
    }
}

/// Renders an error followed by each of its sources, `outer: inner: root`.
pub fn error_chain(err: &(dyn Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
