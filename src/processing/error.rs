use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Failed to read staging file '{0}'")]
    StagingRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write weather file '{0}'")]
    OutputWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to list output directory '{0}'")]
    OutputDirRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to rewrite weather file '{0}'")]
    OutputRewrite(PathBuf, #[source] std::io::Error),
}
