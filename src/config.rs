//! Run configuration, injected into [`crate::PowerSync`] at construction.

use crate::error::PowerSyncError;
use crate::processing::humidity::HumidityOptions;
use crate::processing::merger::MergeOptions;
use crate::processing::sanitizer::SanitizeOptions;
use crate::types::dataset::Dataset;
use chrono::{NaiveDate, Utc};
use std::path::PathBuf;
use std::time::Duration;

const DATA_DIR_NAME: &str = "nasa_power_sync";
pub const DEFAULT_API_BASE_URL: &str = "https://power.larc.nasa.gov/api/temporal";
pub const DEFAULT_START_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2001, 1, 1) {
    Some(date) => date,
    None => panic!("invalid default start date"),
};

/// Directory layout, remote endpoint and processing options for a run.
///
/// Only `base_dir` is required, everything else has the defaults the POWER
/// DSSAT workflow expects.
///
/// # Examples
///
/// ```
/// use nasa_power_sync::SyncConfig;
/// use std::path::Path;
///
/// let config = SyncConfig::builder().base_dir("/tmp/power").build();
/// assert_eq!(config.hourly_staging_path(), Path::new("/tmp/power/Join/hourly.csv"));
/// assert_eq!(config.output_path("p1"), Path::new("/tmp/power/weather-files/p1.WTH"));
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct SyncConfig {
    #[builder(into)]
    pub base_dir: PathBuf,

    #[builder(into, default = "Join".to_string())]
    pub staging_dir_name: String,
    #[builder(into, default = "weather-files".to_string())]
    pub output_dir_name: String,
    #[builder(into, default = "weather-refs".to_string())]
    pub refs_dir_name: String,

    #[builder(into, default = "hourly.csv".to_string())]
    pub hourly_staging_name: String,
    #[builder(into, default = "daily.WTH".to_string())]
    pub daily_staging_name: String,
    #[builder(into, default = "WTH".to_string())]
    pub output_extension: String,

    #[builder(into, default = DEFAULT_API_BASE_URL.to_string())]
    pub api_base_url: String,
    #[builder(default = DEFAULT_START_DATE)]
    pub start_date: NaiveDate,
    /// Last day requested. `None` means today in UTC, evaluated per fetch.
    pub end_date: Option<NaiveDate>,
    #[builder(into, default = "ag".to_string())]
    pub community: String,
    #[builder(into, default = "lst".to_string())]
    pub time_standard: String,
    #[builder(default = Duration::from_secs(600))]
    pub request_timeout: Duration,

    #[builder(default)]
    pub humidity: HumidityOptions,
    #[builder(default)]
    pub merge: MergeOptions,
    #[builder(default)]
    pub sanitize: SanitizeOptions,
}

impl SyncConfig {
    /// Config rooted in the platform data directory (e.g. `~/.local/share/nasa_power_sync`).
    pub fn with_default_base_dir() -> Result<Self, PowerSyncError> {
        Ok(Self::builder().base_dir(default_base_dir()?).build())
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.base_dir.join(&self.staging_dir_name)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(&self.output_dir_name)
    }

    pub fn refs_dir(&self) -> PathBuf {
        self.base_dir.join(&self.refs_dir_name)
    }

    pub fn hourly_staging_path(&self) -> PathBuf {
        self.staging_dir().join(&self.hourly_staging_name)
    }

    pub fn daily_staging_path(&self) -> PathBuf {
        self.staging_dir().join(&self.daily_staging_name)
    }

    pub fn staging_path(&self, dataset: Dataset) -> PathBuf {
        match dataset {
            Dataset::Hourly => self.hourly_staging_path(),
            Dataset::Daily => self.daily_staging_path(),
        }
    }

    pub fn output_path(&self, id: &str) -> PathBuf {
        self.output_dir()
            .join(format!("{}.{}", id, self.output_extension))
    }

    /// Directories created when the pipeline starts.
    pub fn working_dirs(&self) -> [PathBuf; 3] {
        [self.staging_dir(), self.output_dir(), self.refs_dir()]
    }

    pub fn resolved_end_date(&self) -> NaiveDate {
        self.end_date.unwrap_or_else(|| Utc::now().date_naive())
    }
}

pub fn default_base_dir() -> Result<PathBuf, PowerSyncError> {
    dirs::data_dir()
        .ok_or(PowerSyncError::DataDirResolution)
        .map(|p| p.join(DATA_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::ordinal::LeapDayPolicy;
    use std::path::Path;

    #[test]
    fn test_default_layout() {
        let config = SyncConfig::builder().base_dir("/data").build();
        assert_eq!(config.staging_dir(), Path::new("/data/Join"));
        assert_eq!(config.daily_staging_path(), Path::new("/data/Join/daily.WTH"));
        assert_eq!(
            config.staging_path(Dataset::Hourly),
            Path::new("/data/Join/hourly.csv")
        );
        assert_eq!(
            config.working_dirs(),
            [
                PathBuf::from("/data/Join"),
                PathBuf::from("/data/weather-files"),
                PathBuf::from("/data/weather-refs"),
            ]
        );
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2001, 1, 1).unwrap());
        assert_eq!(config.humidity.threshold, 90.0);
        assert_eq!(config.merge.leap_day, LeapDayPolicy::RollOver);
        assert_eq!(config.sanitize.token, "$WEATHER");
    }

    #[test]
    fn test_overrides() {
        let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let config = SyncConfig::builder()
            .base_dir("/data")
            .output_dir_name("out")
            .output_extension("wth")
            .end_date(end)
            .build();
        assert_eq!(config.output_path("a"), Path::new("/data/out/a.wth"));
        assert_eq!(config.resolved_end_date(), end);
    }
}
