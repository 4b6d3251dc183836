//! Entry point tying the fetcher, aggregator, merger and sanitizer together.
//!
//! A [`PowerSync`] owns one base directory. Every point is fetched into the
//! same two staging files, so points are always processed one after another and
//! runs on the same instance never overlap.

use crate::config::SyncConfig;
use crate::cropping::Cropper;
use crate::error::PowerSyncError;
use crate::power_data::fetcher::PowerFetcher;
use crate::processing::humidity::{aggregate_hourly_file, DailyHumidity};
use crate::processing::merger::merge_daily_file;
use crate::processing::sanitizer::{sanitize_dir, SanitizeStats};
use crate::types::coordinate::{CoordinateError, CoordinateRequest};
use crate::types::report::{PointReport, StepStatus, SyncReport};
use crate::utils::{ensure_dir_exists, error_chain};
use log::{error, info, warn};
use std::path::Path;
use tokio::sync::Mutex;

pub const DEFAULT_POINT_ID: &str = "example1";
pub const DEFAULT_POINT_LAT: f64 = -28.0;
pub const DEFAULT_POINT_LON: f64 = -51.0;

/// Synchronizes NASA POWER weather files for a set of points.
///
/// # Examples
///
/// ```no_run
/// # use nasa_power_sync::{PowerSync, PowerSyncError, SyncConfig};
/// # #[tokio::main]
/// # async fn main() -> Result<(), PowerSyncError> {
/// let config = SyncConfig::builder().base_dir("/srv/power").build();
/// let sync = PowerSync::new(config).await?;
/// let report = sync.sync_default().await?;
/// println!("{}", report);
/// # Ok(())
/// # }
/// ```
pub struct PowerSync {
    config: SyncConfig,
    fetcher: PowerFetcher,
    staging_lock: Mutex<()>,
}

impl PowerSync {
    /// Creates the staging, output and reference directories if needed.
    ///
    /// # Errors
    ///
    /// Returns [`PowerSyncError::DirCreation`] or [`PowerSyncError::NotADirectory`]
    /// if a working directory cannot be prepared, and [`PowerSyncError::Fetch`] if
    /// the HTTP client cannot be built.
    pub async fn new(config: SyncConfig) -> Result<Self, PowerSyncError> {
        for dir in config.working_dirs() {
            ensure_dir_exists(&dir).await?;
        }
        let fetcher = PowerFetcher::new(config.request_timeout)?;
        Ok(Self {
            config,
            fetcher,
            staging_lock: Mutex::new(()),
        })
    }

    /// Same as [`PowerSync::new`] with the platform data directory as base.
    pub async fn with_default_dir() -> Result<Self, PowerSyncError> {
        Self::new(SyncConfig::with_default_base_dir()?).await
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The built-in point synchronized by [`PowerSync::sync_default`].
    pub fn default_point() -> Result<CoordinateRequest, CoordinateError> {
        CoordinateRequest::new(DEFAULT_POINT_ID, DEFAULT_POINT_LAT, DEFAULT_POINT_LON)
    }

    pub async fn sync_default(&self) -> Result<SyncReport, PowerSyncError> {
        let point = Self::default_point()?;
        Ok(self.sync(&[point]).await)
    }

    /// Processes every point in order, then sanitizes all files in the output
    /// directory once.
    ///
    /// Step failures never abort the run. They are logged and reported in the
    /// returned [`SyncReport`].
    pub async fn sync(&self, points: &[CoordinateRequest]) -> SyncReport {
        let _staging = self.staging_lock.lock().await;

        let mut reports = Vec::with_capacity(points.len());
        for point in points {
            reports.push(self.process_point(point).await);
        }
        let (sanitize, sanitized) = self.sanitize_outputs().await;

        let report = SyncReport {
            points: reports,
            sanitize,
            sanitized,
        };
        if report.has_failures() {
            warn!(
                "Synchronization finished with failures for {} of {} points",
                report.failed_points().count(),
                report.points.len()
            );
        } else {
            info!("Synchronized {} points", report.points.len());
        }
        report
    }

    /// Fetches, aggregates and merges a single point without sanitizing.
    pub async fn sync_point(&self, point: &CoordinateRequest) -> PointReport {
        let _staging = self.staging_lock.lock().await;
        self.process_point(point).await
    }

    /// Asks `cropper` for the points inside `boundary` and synchronizes them.
    ///
    /// # Errors
    ///
    /// Only a failing cropper is an error; the synchronization itself reports
    /// through the returned [`SyncReport`].
    pub async fn sync_cropped(
        &self,
        cropper: &dyn Cropper,
        boundary: &Path,
        points: &Path,
    ) -> Result<SyncReport, PowerSyncError> {
        let selected = cropper.crop(boundary, points)?;
        info!(
            "Cropper selected {} points inside {:?}",
            selected.len(),
            boundary
        );
        Ok(self.sync(&selected).await)
    }

    async fn process_point(&self, point: &CoordinateRequest) -> PointReport {
        info!("Synchronizing {}", point);
        let output_path = self.config.output_path(point.id());

        let outcome = self.fetcher.fetch_point(&self.config, point).await;
        let fetch_errors: Vec<String> = outcome
            .errors()
            .map(|(dataset, e)| format!("{}: {}", dataset, error_chain(e)))
            .collect();
        let fetch = if fetch_errors.is_empty() {
            StepStatus::Success
        } else {
            StepStatus::failed(fetch_errors.join("; "))
        };

        let (aggregate, humidity, daily) = match aggregate_hourly_file(
            &self.config.hourly_staging_path(),
            &self.config.humidity,
        )
        .await
        {
            Ok(agg) => (
                StepStatus::from_warnings(agg.stats.lines_skipped),
                Some(agg.stats),
                agg.daily,
            ),
            Err(e) => {
                error!("Error processing hourly data: {}", error_chain(&e));
                error!("Error detail: {:?}", e);
                (
                    StepStatus::failed(error_chain(&e)),
                    None,
                    DailyHumidity::default(),
                )
            }
        };

        let (merge, merged) = match merge_daily_file(
            &self.config.daily_staging_path(),
            &output_path,
            &daily,
            &self.config.merge,
        )
        .await
        {
            Ok(merged) => (
                StepStatus::from_warnings(merged.stats.lines_dropped),
                Some(merged.stats),
            ),
            Err(e) => {
                error!("Error processing data: {}", error_chain(&e));
                error!("Error detail: {:?}", e);
                (StepStatus::failed(error_chain(&e)), None)
            }
        };

        if merged.is_some() {
            info!("Processed data for {} written to {:?}", point.id(), output_path);
        }
        PointReport {
            id: point.id().to_string(),
            output_path,
            fetch,
            aggregate,
            merge,
            humidity,
            merged,
        }
    }

    async fn sanitize_outputs(&self) -> (StepStatus, Option<SanitizeStats>) {
        match sanitize_dir(&self.config.output_dir(), &self.config.sanitize).await {
            Ok(stats) => (StepStatus::from_warnings(stats.failures), Some(stats)),
            Err(e) => {
                error!("Error sanitizing weather files: {}", error_chain(&e));
                (StepStatus::failed(error_chain(&e)), None)
            }
        }
    }
}
