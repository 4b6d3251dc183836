//! Source of the points to synchronize.
//!
//! Selecting grid points inside a boundary shape is geoprocessing work done
//! outside this crate. The pipeline only needs something that turns a boundary
//! and a point dataset into coordinate requests.

use crate::types::coordinate::{CoordinateError, CoordinateRequest};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CropError {
    #[error("Boundary '{0}' could not be used")]
    Boundary(PathBuf, #[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Point dataset '{0}' could not be used")]
    Points(PathBuf, #[source] Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Coordinate(#[from] CoordinateError),
}

/// Returns the points of `points` that fall inside `boundary`.
pub trait Cropper: Send + Sync {
    fn crop(&self, boundary: &Path, points: &Path) -> Result<Vec<CoordinateRequest>, CropError>;
}

/// A cropper that ignores its inputs and returns a fixed list of points.
#[derive(Debug, Clone, Default)]
pub struct FixedPoints {
    points: Vec<CoordinateRequest>,
}

impl FixedPoints {
    pub fn new(points: Vec<CoordinateRequest>) -> Self {
        Self { points }
    }

    /// Builds the list from `(id, latitude, longitude)` records.
    pub fn from_records(records: &[(&str, f64, f64)]) -> Result<Self, CropError> {
        let points = records
            .iter()
            .map(|(id, lat, lon)| CoordinateRequest::new(*id, *lat, *lon))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { points })
    }
}

impl Cropper for FixedPoints {
    fn crop(&self, _boundary: &Path, _points: &Path) -> Result<Vec<CoordinateRequest>, CropError> {
        Ok(self.points.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_points() {
        let cropper =
            FixedPoints::from_records(&[("example1", -28.0, -51.0), ("example2", -27.0, -50.0)])
                .unwrap();
        let points = cropper
            .crop(Path::new("area.shp"), Path::new("grid.shp"))
            .unwrap();
        assert_eq!(
            points.iter().map(|p| p.id()).collect::<Vec<_>>(),
            ["example1", "example2"]
        );
    }

    #[test]
    fn test_invalid_record() {
        let result = FixedPoints::from_records(&[("bad id", 0.0, 0.0)]);
        assert!(matches!(
            result,
            Err(CropError::Coordinate(CoordinateError::InvalidId(_)))
        ));
    }
}
