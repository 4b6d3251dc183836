use chrono::NaiveDate;
use nasa_power_sync::{CoordinateRequest, PowerSync, PowerSyncError, SyncConfig};

#[tokio::main]
async fn main() -> Result<(), PowerSyncError> {
    // Set RUST_LOG=info (or debug) to see per-step messages
    pretty_env_logger::init();

    let config = SyncConfig::builder()
        .base_dir(std::env::temp_dir().join("nasa_power_demo"))
        .start_date(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap())
        .end_date(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap())
        .build();
    let sync = PowerSync::new(config).await?;

    // Passo Fundo, Rio Grande do Sul
    let point = CoordinateRequest::new("passo_fundo", -28.26, -52.41)?;
    let report = sync.sync(&[point]).await;
    println!("{}", report);

    for point in report.failed_points() {
        eprintln!("Output for {} is suspect", point.id);
    }

    Ok(())
}
