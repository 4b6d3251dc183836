mod config;
mod cropping;
mod error;
mod pipeline;
mod power_data;
mod processing;
mod types;
mod utils;

pub use config::{default_base_dir, SyncConfig, DEFAULT_API_BASE_URL, DEFAULT_START_DATE};
pub use error::PowerSyncError;
pub use pipeline::*;

pub use cropping::{CropError, Cropper, FixedPoints};

pub use types::coordinate::{CoordinateError, CoordinateRequest};
pub use types::dataset::Dataset;
pub use types::report::{PointReport, StepStatus, SyncReport};

pub use power_data::error::FetchError;
pub use power_data::fetcher::{FetchOutcome, PowerFetcher};

pub use processing::error::ProcessingError;
pub use processing::humidity::{
    aggregate_hourly, aggregate_hourly_file, DailyHumidity, HourlyRecord, HumidityAggregate,
    HumidityOptions, HumidityStats,
};
pub use processing::merger::{merge_daily, merge_daily_file, MergeOptions, MergeStats, MergedWeather};
pub use processing::ordinal::{date_key, LeapDayPolicy, OrdinalDate, OrdinalError};
pub use processing::sanitizer::{sanitize_dir, sanitize_text, SanitizeOptions, SanitizeStats};

pub use utils::error_chain;
