use crate::cropping::CropError;
use crate::power_data::error::FetchError;
use crate::processing::error::ProcessingError;
use crate::types::coordinate::CoordinateError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PowerSyncError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Processing(#[from] ProcessingError),

    #[error(transparent)]
    Crop(#[from] CropError),

    #[error(transparent)]
    Coordinate(#[from] CoordinateError),

    #[error("Failed to create working directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Working path exists but is not a directory: '{0}'")]
    NotADirectory(PathBuf),

    #[error("Failed to determine data directory")]
    DataDirResolution,
}
