//! Stormglass point-weather client.

use chrono::{DateTime, Duration as ChronoDuration, SecondsFormat, Utc};
use meteomar_core::{ReqwestErrorExt, WeatherConfig};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::error::FetchError;
use crate::location::Location;
use crate::raw::RawPayload;

/// Parameters requested for current conditions.
pub const CURRENT_PARAMS: &str =
    "airTemperature,waterTemperature,windSpeed,windDirection,waveHeight,pressure,visibility";

/// Parameters requested for the forecast window.
pub const FORECAST_PARAMS: &str = "airTemperature,windSpeed,waveHeight";

/// Length of the forecast window.
pub const FORECAST_WINDOW_HOURS: i64 = 24;

const POINT_PATH: &str = "/weather/point";
const SOURCE: &str = "sg";

/// Both raw documents of one fetch cycle.
#[derive(Debug, Clone)]
pub struct LivePayload {
    pub current: RawPayload,
    pub forecast: RawPayload,
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
}

impl WeatherProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.into_network_error()))?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self, FetchError> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Fetch current conditions and the next 24 hours for `location`.
    pub async fn fetch_live(
        &self,
        location: &Location,
        api_key: &str,
    ) -> Result<LivePayload, FetchError> {
        self.fetch_live_at(location, api_key, Utc::now()).await
    }

    /// Like [`fetch_live`](Self::fetch_live) with an explicit "now" for the forecast window.
    ///
    /// Both queries run concurrently and both must succeed; the first
    /// failure aborts the cycle.
    #[instrument(skip(self, api_key), fields(location = location.id), level = "info")]
    pub async fn fetch_live_at(
        &self,
        location: &Location,
        api_key: &str,
        now: DateTime<Utc>,
    ) -> Result<LivePayload, FetchError> {
        let window = (now, now + ChronoDuration::hours(FORECAST_WINDOW_HOURS));

        let (current, forecast) = tokio::try_join!(
            self.query(location, api_key, CURRENT_PARAMS, None),
            self.query(location, api_key, FORECAST_PARAMS, Some(window)),
        )?;

        if current.hours.iter().all(Option::is_none) {
            return Err(FetchError::NoData);
        }

        tracing::info!(
            current_hours = current.hours.len(),
            forecast_hours = forecast.hours.len(),
            "Live fetch succeeded"
        );
        Ok(LivePayload { current, forecast })
    }

    async fn query(
        &self,
        location: &Location,
        api_key: &str,
        params: &str,
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<RawPayload, FetchError> {
        let url = format!("{}{}", self.base_url, POINT_PATH);

        let mut query = vec![
            ("lat", location.latitude.to_string()),
            ("lng", location.longitude.to_string()),
            ("params", params.to_string()),
            ("source", SOURCE.to_string()),
        ];
        if let Some((start, end)) = window {
            query.push(("start", start.to_rfc3339_opts(SecondsFormat::Secs, true)));
            query.push(("end", end.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }

        tracing::debug!(%url, params, "Querying provider");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, api_key)
            .query(&query)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.into_network_error()))?;

        let payload = Self::handle_response(response).await?;
        if let Some(meta) = &payload.meta {
            tracing::debug!(
                cost = ?meta.cost,
                request_count = ?meta.request_count,
                daily_quota = ?meta.daily_quota,
                "Provider quota"
            );
            if meta.remaining() == Some(0) {
                tracing::warn!("Daily provider quota is used up");
            }
        }
        Ok(payload)
    }

    /// Map HTTP status to [`FetchError`] and decode successful bodies.
    async fn handle_response(response: reqwest::Response) -> Result<RawPayload, FetchError> {
        let status = response.status();

        if status.is_success() {
            let body = response
                .bytes()
                .await
                .map_err(|e| FetchError::Transport(e.into_network_error()))?;
            serde_json::from_slice(&body).map_err(|e| FetchError::InvalidResponse(e.to_string()))
        } else if status.as_u16() == 401 {
            Err(FetchError::InvalidCredential)
        } else if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok());
            Err(FetchError::RateLimited { retry_after })
        } else {
            tracing::debug!(status = status.as_u16(), "Provider returned an error status");
            Err(FetchError::ProviderError {
                status: status.as_u16(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::location::get_location;
    use chrono::TimeZone;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> WeatherProvider {
        WeatherProvider::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn hours_body() -> serde_json::Value {
        serde_json::json!({
            "hours": [
                {"time": "2024-06-01T12:00:00+00:00", "airTemperature": {"sg": 16.2}, "windSpeed": {"sg": 6.1}},
                {"time": "2024-06-01T13:00:00+00:00", "airTemperature": {"sg": 16.8}, "windSpeed": {"sg": 6.4}}
            ],
            "meta": {"cost": 1, "dailyQuota": 10}
        })
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_live_issues_both_queries() {
        let server = MockServer::start().await;
        let brest = get_location("brest").unwrap();

        Mock::given(method("GET"))
            .and(path("/weather/point"))
            .and(header("Authorization", "test-key"))
            .and(query_param("params", CURRENT_PARAMS))
            .and(query_param("lat", "48.3833"))
            .and(query_param("lng", "-4.4833"))
            .and(query_param("source", "sg"))
            .respond_with(ResponseTemplate::new(200).set_body_json(hours_body()))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/weather/point"))
            .and(header("Authorization", "test-key"))
            .and(query_param("params", FORECAST_PARAMS))
            .and(query_param("start", "2024-06-01T12:00:00Z"))
            .and(query_param("end", "2024-06-02T12:00:00Z"))
            .respond_with(ResponseTemplate::new(200).set_body_json(hours_body()))
            .expect(1)
            .mount(&server)
            .await;

        let payload = provider(&server)
            .fetch_live_at(brest, "test-key", now())
            .await
            .unwrap();

        assert_eq!(payload.current.hours.len(), 2);
        assert_eq!(payload.forecast.hours.len(), 2);
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_invalid_credential() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather/point"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = provider(&server)
            .fetch_live_at(get_location("nord").unwrap(), "bad-key", now())
            .await;

        assert!(matches!(result, Err(FetchError::InvalidCredential)));
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather/point"))
            .respond_with(ResponseTemplate::new(429).append_header("Retry-After", "120"))
            .mount(&server)
            .await;

        let result = provider(&server)
            .fetch_live_at(get_location("nord").unwrap(), "key", now())
            .await;

        assert!(matches!(
            result,
            Err(FetchError::RateLimited {
                retry_after: Some(120)
            })
        ));
    }

    #[tokio::test]
    async fn test_other_status_maps_to_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather/point"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = provider(&server)
            .fetch_live_at(get_location("sud").unwrap(), "key", now())
            .await;

        assert!(matches!(
            result,
            Err(FetchError::ProviderError { status: 503 })
        ));
    }

    #[tokio::test]
    async fn test_partial_success_is_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather/point"))
            .and(query_param("params", CURRENT_PARAMS))
            .respond_with(ResponseTemplate::new(200).set_body_json(hours_body()))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/weather/point"))
            .and(query_param("params", FORECAST_PARAMS))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = provider(&server)
            .fetch_live_at(get_location("morlaix").unwrap(), "key", now())
            .await;

        assert!(matches!(
            result,
            Err(FetchError::ProviderError { status: 500 })
        ));
    }

    #[tokio::test]
    async fn test_empty_current_response_is_no_data() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather/point"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"hours": []})),
            )
            .mount(&server)
            .await;

        let result = provider(&server)
            .fetch_live_at(get_location("quiberon").unwrap(), "key", now())
            .await;

        assert!(matches!(result, Err(FetchError::NoData)));
    }

    #[tokio::test]
    async fn test_garbage_body_is_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather/point"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result = provider(&server)
            .fetch_live_at(get_location("finistere").unwrap(), "key", now())
            .await;

        assert!(matches!(result, Err(FetchError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let provider = WeatherProvider::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let result = provider
            .fetch_live_at(get_location("nord").unwrap(), "key", now())
            .await;

        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}
