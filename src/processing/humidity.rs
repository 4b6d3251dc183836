//! Derives the daily RH90 count (hours with relative humidity at or above the
//! threshold) from the hourly POWER CSV.

use crate::processing::error::ProcessingError;
use crate::processing::ordinal::date_key;
use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HumidityOptions {
    /// Hours with `RH2M >= threshold` are counted.
    pub threshold: f64,
    /// Lines of provider metadata at the top of the CSV.
    pub preamble_lines: usize,
}

impl Default for HumidityOptions {
    fn default() -> Self {
        Self {
            threshold: 90.0,
            preamble_lines: 9,
        }
    }
}

/// One row of the hourly CSV: `YEAR,MO,DY,HR,RH2M`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyRecord {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// `None` when the field is present but not a number.
    pub relative_humidity: Option<f64>,
}

impl HourlyRecord {
    /// Returns `None` if the line has fewer than five fields or the year, month
    /// or day is missing or out of range.
    pub fn parse(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 5 {
            return None;
        }
        let year: i32 = fields[0].parse().ok()?;
        let month: u32 = fields[1].parse().ok()?;
        let day: u32 = fields[2].parse().ok()?;
        if fields[3].is_empty() || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        Some(Self {
            year,
            month,
            day,
            relative_humidity: fields[4].parse().ok(),
        })
    }

    /// Whether `line` is the `YEAR,MO,DY,HR,RH2M` column row.
    pub fn is_column_header(line: &str) -> bool {
        line.split(',')
            .next()
            .is_some_and(|first| first.trim().eq_ignore_ascii_case("YEAR"))
    }

    /// `YYYYMMDD` with month and day zero-padded.
    pub fn date_key(&self) -> String {
        format!("{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

/// `YYYYMMDD` → number of qualifying hours.
///
/// Every date that appears in the hourly data has an entry, even if none of its
/// hours qualified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyHumidity(BTreeMap<String, u32>);

impl DailyHumidity {
    pub fn get(&self, key: &str) -> Option<u32> {
        self.0.get(key).copied()
    }

    pub fn for_date(&self, date: NaiveDate) -> Option<u32> {
        self.get(&date_key(date))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    fn record(&mut self, key: String, qualifies: bool) {
        let count = self.0.entry(key).or_insert(0);
        if qualifies {
            *count += 1;
        }
    }
}

impl FromIterator<(String, u32)> for DailyHumidity {
    fn from_iter<T: IntoIterator<Item = (String, u32)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HumidityStats {
    pub lines_used: usize,
    /// Column rows repeated by the provider after the preamble.
    pub header_rows: usize,
    /// Malformed rows.
    pub lines_skipped: usize,
    /// Rows whose humidity field was not numeric. They still register the date.
    pub unparsed_humidity: usize,
    pub qualifying_hours: usize,
    pub days: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HumidityAggregate {
    pub daily: DailyHumidity,
    pub stats: HumidityStats,
}

/// Builds the RH90 map from the text of the hourly CSV.
///
/// ```
/// use nasa_power_sync::{aggregate_hourly, HumidityOptions};
///
/// let options = HumidityOptions { preamble_lines: 0, ..Default::default() };
/// let agg = aggregate_hourly("2001,01,01,00,95\n2001,01,01,01,80\n", &options);
/// assert_eq!(agg.daily.get("20010101"), Some(1));
/// ```
pub fn aggregate_hourly(text: &str, options: &HumidityOptions) -> HumidityAggregate {
    let mut daily = DailyHumidity::default();
    let mut stats = HumidityStats::default();

    for line in text.lines().skip(options.preamble_lines) {
        if line.trim().is_empty() {
            debug!("Skipping empty line");
            continue;
        }
        if HourlyRecord::is_column_header(line) {
            debug!("Skipping column header: {}", line);
            stats.header_rows += 1;
            continue;
        }
        let Some(record) = HourlyRecord::parse(line) else {
            warn!("Skipping malformed line: {}", line);
            stats.lines_skipped += 1;
            continue;
        };

        let qualifies = match record.relative_humidity {
            Some(rh) => rh >= options.threshold,
            None => {
                debug!("Non-numeric humidity treated as below threshold: {}", line);
                stats.unparsed_humidity += 1;
                false
            }
        };
        if qualifies {
            stats.qualifying_hours += 1;
        }
        daily.record(record.date_key(), qualifies);
        stats.lines_used += 1;
    }

    stats.days = daily.len();
    HumidityAggregate { daily, stats }
}

/// Reads the hourly staging file and aggregates it.
pub async fn aggregate_hourly_file(
    path: &Path,
    options: &HumidityOptions,
) -> Result<HumidityAggregate, ProcessingError> {
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| ProcessingError::StagingRead(path.to_path_buf(), e))?;
    let aggregate = aggregate_hourly(&text, options);
    info!(
        "Aggregated {} hourly rows into {} days from {:?} ({} skipped)",
        aggregate.stats.lines_used,
        aggregate.stats.days,
        path,
        aggregate.stats.lines_skipped
    );
    Ok(aggregate)
}
