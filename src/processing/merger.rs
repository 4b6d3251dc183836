//! Appends the RH90 column to the daily ICASA weather file.

use crate::processing::error::ProcessingError;
use crate::processing::humidity::DailyHumidity;
use crate::processing::ordinal::{LeapDayPolicy, OrdinalDate};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::Path;
use tokio::fs;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeOptions {
    /// A line containing this marker is the column header of the data block.
    pub header_marker: String,
    /// Appended verbatim to the header line.
    pub header_suffix: String,
    /// Width the count is right-justified to.
    pub column_width: usize,
    pub leap_day: LeapDayPolicy,
    /// Keep the lines above the column header (`$WEATHER`, `@ INSI`, station
    /// line) in the output instead of dropping them.
    pub preserve_header_block: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            header_marker: "@  DATE".to_string(),
            header_suffix: "    RH90".to_string(),
            column_width: 7,
            leap_day: LeapDayPolicy::RollOver,
            preserve_header_block: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub header_lines: usize,
    /// Lines above the column header that were left out of the output.
    pub header_block_lines: usize,
    pub preserved_lines: usize,
    pub records_written: usize,
    /// Records whose date had an entry in the humidity map.
    pub records_matched: usize,
    /// Malformed records. Provider header lines are not counted here.
    pub lines_dropped: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedWeather {
    pub lines: Vec<String>,
    pub stats: MergeStats,
}

impl MergedWeather {
    /// Output file content: lines joined with `\n`, no trailing newline.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Merges the daily weather text with the humidity map.
///
/// Lines above the column header are station metadata and never treated as
/// records. Without a column header every line must be a record.
///
/// ```
/// use nasa_power_sync::{merge_daily, DailyHumidity, MergeOptions};
///
/// let humidity: DailyHumidity = [("20010101".to_string(), 1)].into_iter().collect();
/// let merged = merge_daily("@  DATE  SRAD\n2001001  18.2\n", &humidity, &MergeOptions::default());
/// assert_eq!(merged.lines, vec!["@  DATE  SRAD    RH90", "2001001  18.2      1"]);
/// ```
pub fn merge_daily(text: &str, humidity: &DailyHumidity, options: &MergeOptions) -> MergedWeather {
    let mut merged = MergedWeather::default();
    let mut in_header_block = text.lines().any(|l| l.contains(&options.header_marker));
    if !in_header_block {
        warn!("No {:?} column header found", options.header_marker);
    }

    for line in text.lines() {
        let clean = line.replace('\r', "");

        if line.contains(&options.header_marker) {
            merged
                .lines
                .push(format!("{}{}", clean, options.header_suffix));
            merged.stats.header_lines += 1;
            in_header_block = false;
            continue;
        }

        if in_header_block {
            if options.preserve_header_block {
                merged.lines.push(clean);
                merged.stats.preserved_lines += 1;
            } else {
                debug!("Dropping header block line: {}", clean);
                merged.stats.header_block_lines += 1;
            }
            continue;
        }

        let Some(token) = line.split_whitespace().next() else {
            warn!("Line does not contain yyyyddd value: {:?}", line);
            merged.stats.lines_dropped += 1;
            continue;
        };

        let date = match OrdinalDate::parse(token).and_then(|d| d.to_calendar(options.leap_day)) {
            Ok(date) => date,
            Err(e) => {
                warn!("{} in line: {}", e, clean);
                merged.stats.lines_dropped += 1;
                continue;
            }
        };

        let count = match humidity.for_date(date) {
            Some(count) => {
                merged.stats.records_matched += 1;
                count
            }
            None => 0,
        };
        merged.lines.push(format!(
            "{}{:>width$}",
            clean,
            count,
            width = options.column_width
        ));
        merged.stats.records_written += 1;
    }

    merged
}

/// Reads the daily staging file, merges it and overwrites `output_path`.
pub async fn merge_daily_file(
    daily_path: &Path,
    output_path: &Path,
    humidity: &DailyHumidity,
    options: &MergeOptions,
) -> Result<MergedWeather, ProcessingError> {
    let text = fs::read_to_string(daily_path)
        .await
        .map_err(|e| ProcessingError::StagingRead(daily_path.to_path_buf(), e))?;
    let merged = merge_daily(&text, humidity, options);
    fs::write(output_path, merged.to_text())
        .await
        .map_err(|e| ProcessingError::OutputWrite(output_path.to_path_buf(), e))?;
    info!(
        "Wrote {} records to {:?} ({} matched, {} dropped)",
        merged.stats.records_written,
        output_path,
        merged.stats.records_matched,
        merged.stats.lines_dropped
    );
    Ok(merged)
}
