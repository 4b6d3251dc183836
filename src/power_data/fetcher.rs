use crate::config::SyncConfig;
use crate::power_data::error::FetchError;
use crate::types::coordinate::CoordinateRequest;
use crate::types::dataset::Dataset;
use crate::utils::error_chain;
use chrono::NaiveDate;
use futures_util::TryStreamExt;
use log::{error, info, warn};
use reqwest::{Client, Url};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::StreamReader;

/// Result of downloading both datasets for one point.
#[derive(Debug)]
pub struct FetchOutcome {
    /// Bytes written to the hourly staging file.
    pub hourly: Result<u64, FetchError>,
    /// Bytes written to the daily staging file.
    pub daily: Result<u64, FetchError>,
}

impl FetchOutcome {
    pub fn is_complete(&self) -> bool {
        self.hourly.is_ok() && self.daily.is_ok()
    }

    pub fn errors(&self) -> impl Iterator<Item = (Dataset, &FetchError)> {
        [(Dataset::Hourly, &self.hourly), (Dataset::Daily, &self.daily)]
            .into_iter()
            .filter_map(|(dataset, result)| result.as_ref().err().map(|e| (dataset, e)))
    }
}

/// Downloads POWER point data into the staging files.
pub struct PowerFetcher {
    client: Client,
}

impl PowerFetcher {
    pub fn new(request_timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self { client })
    }

    /// Builds the point-query URL for one dataset.
    pub fn dataset_url(
        config: &SyncConfig,
        dataset: Dataset,
        point: &CoordinateRequest,
        end_date: NaiveDate,
    ) -> Result<Url, FetchError> {
        let endpoint = format!(
            "{}/{}/point",
            config.api_base_url.trim_end_matches('/'),
            dataset.path_segment()
        );
        let params = [
            ("start", config.start_date.format("%Y%m%d").to_string()),
            ("end", end_date.format("%Y%m%d").to_string()),
            ("latitude", point.latitude().to_string()),
            ("longitude", point.longitude().to_string()),
            ("community", config.community.clone()),
            ("parameters", dataset.parameters().to_string()),
            ("format", dataset.format().to_string()),
            ("header", "true".to_string()),
            ("time-standard", config.time_standard.clone()),
        ];
        Url::parse_with_params(&endpoint, &params)
            .map_err(|e| FetchError::InvalidUrl(endpoint, Box::new(e)))
    }

    /// Fetches the hourly then the daily dataset. Both are always attempted;
    /// each failure is logged and returned in the outcome.
    pub async fn fetch_point(&self, config: &SyncConfig, point: &CoordinateRequest) -> FetchOutcome {
        let end_date = config.resolved_end_date();
        let hourly = self
            .fetch_dataset(config, Dataset::Hourly, point, end_date)
            .await;
        let daily = self
            .fetch_dataset(config, Dataset::Daily, point, end_date)
            .await;

        let outcome = FetchOutcome { hourly, daily };
        if outcome.is_complete() {
            info!("Data fetching completed successfully for {}", point);
        }
        for (dataset, e) in outcome.errors() {
            error!(
                "Error fetching {} data for {}: {}",
                dataset,
                point,
                error_chain(e)
            );
            error!("Error detail: {:?}", e);
        }
        outcome
    }

    async fn fetch_dataset(
        &self,
        config: &SyncConfig,
        dataset: Dataset,
        point: &CoordinateRequest,
        end_date: NaiveDate,
    ) -> Result<u64, FetchError> {
        let url = Self::dataset_url(config, dataset, point, end_date)?;
        self.download_to_file(url, &config.staging_path(dataset))
            .await
    }

    /// Streams the response body of `url` into `path`, replacing its content.
    ///
    /// The staging file is only truncated once the server answered with a
    /// success status, so an HTTP error leaves the previous content in place.
    pub async fn download_to_file(&self, url: Url, path: &Path) -> Result<u64, FetchError> {
        info!("Downloading data from {}", url);
        let url_text = url.to_string();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url_text.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url_text, e);
                return Err(if let Some(status) = e.status() {
                    FetchError::HttpStatus {
                        url: url_text,
                        status,
                        source: e,
                    }
                } else {
                    FetchError::NetworkRequest(url_text, e)
                });
            }
        };

        let mut file = fs::File::create(path)
            .await
            .map_err(|e| FetchError::StagingCreate(path.to_path_buf(), e))?;

        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
        let reader = StreamReader::new(stream);
        tokio::pin!(reader);

        let written = tokio::io::copy(&mut reader, &mut file)
            .await
            .map_err(|e| FetchError::StreamWrite(path.to_path_buf(), e))?;
        file.flush()
            .await
            .map_err(|e| FetchError::StreamWrite(path.to_path_buf(), e))?;

        info!("Wrote {} bytes to {:?}", written, path);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::power_data::test_server::{MockPower, Route};

    fn point() -> CoordinateRequest {
        CoordinateRequest::new("example1", -28.0, -51.0).unwrap()
    }

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
    }

    #[test]
    fn test_hourly_url() {
        let config = SyncConfig::builder().base_dir("/data").build();
        let url = PowerFetcher::dataset_url(&config, Dataset::Hourly, &point(), end()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://power.larc.nasa.gov/api/temporal/hourly/point?start=20010101&end=20240517\
             &latitude=-28&longitude=-51&community=ag&parameters=RH2M&format=csv&header=true\
             &time-standard=lst"
        );
    }

    #[test]
    fn test_daily_url_encodes_parameter_list() {
        let config = SyncConfig::builder()
            .base_dir("/data")
            .api_base_url("http://localhost:1234/api/")
            .build();
        let point = CoordinateRequest::new("p", 12.25, 7.5).unwrap();
        let url = PowerFetcher::dataset_url(&config, Dataset::Daily, &point, end()).unwrap();
        assert_eq!(url.path(), "/api/daily/point");
        let query = url.query().unwrap();
        assert!(query.contains(
            "parameters=T2MDEW%2CT2M_MIN%2CT2M_MAX%2CRH2M%2CPRECTOTCORR%2CWS2M%2CALLSKY_SFC_SW_DWN"
        ));
        assert!(query.contains("format=icasa"));
        assert!(query.contains("latitude=12.25&longitude=7.5"));
    }

    #[test]
    fn test_invalid_base_url() {
        let config = SyncConfig::builder()
            .base_dir("/data")
            .api_base_url("not a url")
            .build();
        let result = PowerFetcher::dataset_url(&config, Dataset::Daily, &point(), end());
        assert!(matches!(result, Err(FetchError::InvalidUrl(_, _))));
    }

    #[tokio::test]
    async fn test_fetch_point_writes_both_staging_files() {
        let server = MockPower::start(vec![
            Route::ok("/hourly/point", "hourly body"),
            Route::ok("/daily/point", "daily body"),
        ])
        .await;
        let dir = tempfile::tempdir().unwrap();
        let config = SyncConfig::builder()
            .base_dir(dir.path())
            .api_base_url(server.base_url())
            .end_date(end())
            .build();
        fs::create_dir_all(config.staging_dir()).await.unwrap();

        let fetcher = PowerFetcher::new(Duration::from_secs(5)).unwrap();
        let outcome = fetcher.fetch_point(&config, &point()).await;

        assert!(outcome.is_complete());
        assert_eq!(outcome.hourly.unwrap(), 11);
        assert_eq!(
            fs::read_to_string(config.daily_staging_path()).await.unwrap(),
            "daily body"
        );
        let requests = server.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].starts_with("/hourly/point?start=20010101&end=20240517"));
        assert!(requests[1].starts_with("/daily/point?"));
    }

    #[tokio::test]
    async fn test_http_error_keeps_stale_staging_and_still_fetches_daily() {
        let server = MockPower::start(vec![
            Route::status("/hourly/point", 500, "boom"),
            Route::ok("/daily/point", "fresh daily"),
        ])
        .await;
        let dir = tempfile::tempdir().unwrap();
        let config = SyncConfig::builder()
            .base_dir(dir.path())
            .api_base_url(server.base_url())
            .end_date(end())
            .build();
        fs::create_dir_all(config.staging_dir()).await.unwrap();
        fs::write(config.hourly_staging_path(), "stale hourly").await.unwrap();

        let fetcher = PowerFetcher::new(Duration::from_secs(5)).unwrap();
        let outcome = fetcher.fetch_point(&config, &point()).await;

        assert!(!outcome.is_complete());
        match &outcome.hourly {
            Err(FetchError::HttpStatus { status, .. }) => assert_eq!(status.as_u16(), 500),
            other => panic!("expected HTTP status error, got {:?}", other),
        }
        assert!(outcome.daily.is_ok());
        assert_eq!(outcome.errors().count(), 1);
        assert_eq!(
            fs::read_to_string(config.hourly_staging_path()).await.unwrap(),
            "stale hourly"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let dir = tempfile::tempdir().unwrap();
        let url = Url::parse(&format!("{}/hourly/point", MockPower::unused_base_url().await)).unwrap();
        let fetcher = PowerFetcher::new(Duration::from_secs(5)).unwrap();
        let result = fetcher
            .download_to_file(url, &dir.path().join("hourly.csv"))
            .await;
        assert!(matches!(result, Err(FetchError::NetworkRequest(_, _))));
    }

    #[tokio::test]
    async fn test_request_timeout() {
        let server = MockPower::start(vec![Route::hang("/hourly/point")]).await;
        let dir = tempfile::tempdir().unwrap();
        let url = Url::parse(&format!("{}/hourly/point", server.base_url())).unwrap();
        let fetcher = PowerFetcher::new(Duration::from_millis(200)).unwrap();
        let result = fetcher
            .download_to_file(url, &dir.path().join("hourly.csv"))
            .await;
        match result {
            Err(FetchError::NetworkRequest(_, e)) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
