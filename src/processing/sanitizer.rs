//! Post-pass over every generated weather file, replacing the `$WEATHER` section
//! marker with `*WEATHER` as DSSAT expects.

use crate::processing::error::ProcessingError;
use crate::utils::error_chain;
use log::{debug, error, info};
use serde::Serialize;
use std::path::Path;
use tokio::fs;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SanitizeOptions {
    pub token: String,
    pub replacement: String,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            token: "$WEATHER".to_string(),
            replacement: "*WEATHER".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SanitizeStats {
    pub files_scanned: usize,
    pub files_rewritten: usize,
    pub replacements: usize,
    /// Files that could not be read or rewritten.
    pub failures: usize,
}

/// Replaces every occurrence of the token. Returns the new text and the number
/// of replacements made.
pub fn sanitize_text(text: &str, options: &SanitizeOptions) -> (String, usize) {
    if options.token.is_empty() {
        return (text.to_string(), 0);
    }
    let count = text.matches(options.token.as_str()).count();
    if count == 0 {
        return (text.to_string(), 0);
    }
    (text.replace(options.token.as_str(), &options.replacement), count)
}

/// Sanitizes every regular file in `dir`, not just the ones written by the
/// current run. Files that already contain no token are left untouched.
///
/// A file that fails to read or write is logged and counted; only failing to
/// list the directory is an error.
pub async fn sanitize_dir(
    dir: &Path,
    options: &SanitizeOptions,
) -> Result<SanitizeStats, ProcessingError> {
    let mut stats = SanitizeStats::default();
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| ProcessingError::OutputDirRead(dir.to_path_buf(), e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ProcessingError::OutputDirRead(dir.to_path_buf(), e))?
    {
        let path = entry.path();
        match entry.file_type().await {
            Ok(file_type) if file_type.is_file() => {}
            Ok(_) => continue,
            Err(e) => {
                error!("Could not stat {:?}: {}", path, error_chain(&e));
                stats.failures += 1;
                continue;
            }
        }

        stats.files_scanned += 1;
        match sanitize_file(&path, options).await {
            Ok(0) => debug!("No {} token in {:?}", options.token, path),
            Ok(count) => {
                stats.files_rewritten += 1;
                stats.replacements += count;
                debug!("Replaced {} token(s) in {:?}", count, path);
            }
            Err(e) => {
                error!("Error sanitizing weather file: {}", error_chain(&e));
                stats.failures += 1;
            }
        }
    }

    info!(
        "Sanitized {} weather files in {:?} ({} rewritten, {} failed)",
        stats.files_scanned, dir, stats.files_rewritten, stats.failures
    );
    Ok(stats)
}

async fn sanitize_file(path: &Path, options: &SanitizeOptions) -> Result<usize, ProcessingError> {
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| ProcessingError::OutputRewrite(path.to_path_buf(), e))?;
    let (updated, count) = sanitize_text(&text, options);
    if count > 0 {
        fs::write(path, updated)
            .await
            .map_err(|e| ProcessingError::OutputRewrite(path.to_path_buf(), e))?;
    }
    Ok(count)
}
