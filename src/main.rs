use chrono::NaiveDate;
use clap::Parser;
use nasa_power_sync::{
    default_base_dir, CoordinateRequest, LeapDayPolicy, MergeOptions, PowerSync, PowerSyncError,
    SyncConfig,
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Download NASA POWER data and build DSSAT weather files with an RH90 column
struct Cli {
    /// Directory holding Join/, weather-files/ and weather-refs/
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Point to synchronize, may be repeated. Defaults to the built-in example point
    #[arg(long = "point", value_name = "ID,LAT,LON")]
    points: Vec<CoordinateRequest>,

    /// First day requested (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last day requested (YYYY-MM-DD), today in UTC if omitted
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 600)]
    timeout_secs: u64,

    /// Drop lines dated day 366 of a common year instead of mapping them to January 1st of the next year
    #[arg(long)]
    leap_day_reject: bool,

    /// Keep the weather file header lines above the column header
    #[arg(long)]
    preserve_header: bool,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), PowerSyncError> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let base_dir = match cli.base_dir {
        Some(dir) => dir,
        None => default_base_dir()?,
    };
    let merge = MergeOptions {
        leap_day: if cli.leap_day_reject {
            LeapDayPolicy::Reject
        } else {
            LeapDayPolicy::RollOver
        },
        preserve_header_block: cli.preserve_header,
        ..Default::default()
    };
    let config = SyncConfig::builder()
        .base_dir(base_dir)
        .maybe_start_date(cli.start)
        .maybe_end_date(cli.end)
        .request_timeout(Duration::from_secs(cli.timeout_secs))
        .merge(merge)
        .build();

    let sync = PowerSync::new(config).await?;
    let report = if cli.points.is_empty() {
        sync.sync_default().await?
    } else {
        sync.sync(&cli.points).await
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error: {}", e),
        }
    } else {
        println!("{}", report);
    }

    Ok(())
}
