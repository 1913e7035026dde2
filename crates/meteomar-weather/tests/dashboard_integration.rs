//! End-to-end tests for the dashboard against a mock provider.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use chrono::{DurationRound, TimeDelta, Utc};
use meteomar_core::Config;
use meteomar_weather::{
    Advisory, Connectivity, Dashboard, DashboardUpdate, DataSource, DegradedReason, Presenter,
    SnapshotCache,
};
use parking_lot::Mutex;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct Recorder {
    updates: Mutex<Vec<DashboardUpdate>>,
}

impl Presenter for Recorder {
    fn present(&self, update: &DashboardUpdate) {
        self.updates.lock().push(update.clone());
    }
}

/// 24 identical hourly records starting at the current hour: strong wind
/// (10 m/s) and no wave height.
fn hourly_body() -> serde_json::Value {
    let start = Utc::now()
        .duration_trunc(TimeDelta::hours(1))
        .unwrap_or_else(|_| Utc::now());
    let hours: Vec<_> = (0..24)
        .map(|i| {
            serde_json::json!({
                "time": (start + TimeDelta::hours(i)).to_rfc3339(),
                "airTemperature": {"sg": 0.0, "noaa": 1.5},
                "waterTemperature": {"sg": 12.4},
                "windSpeed": {"sg": 10.0},
                "windDirection": {"sg": 202.5},
                "pressure": {"sg": 1009.3},
                "visibility": {"noaa": 14.0}
            })
        })
        .collect();
    serde_json::json!({ "hours": hours, "meta": {"cost": 1} })
}

fn dashboard(dir: &std::path::Path, base_url: &str) -> Dashboard<Recorder> {
    let mut config = Config::with_dir(dir);
    config.weather.api_key = Some("integration-key".to_string());
    config.weather.api_base_url = base_url.to_string();
    Dashboard::new(config, Connectivity::online(), Recorder::default()).unwrap()
}

#[tokio::test]
async fn test_live_refresh_normalizes_and_caches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/point"))
        .and(header("Authorization", "integration-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hourly_body()))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dash = dashboard(dir.path(), &server.uri());

    let update = dash.on_refresh_requested().await.unwrap();
    assert_eq!(update.source, DataSource::Live);

    let obs = &update.observation;
    assert_eq!(obs.location_id, "nord");
    assert_eq!(obs.air_temp_c, Some(0.0));
    assert_eq!(obs.water_temp_c, Some(12.4));
    assert_eq!(obs.wave_height_m, None);
    assert_eq!(obs.visibility_km, Some(14.0));
    assert_eq!(obs.wind_dir_deg, Some(202.5));
    let wind = obs.wind_speed_kt.unwrap();
    assert!((wind - 19.43844).abs() < 1e-6);

    // 19.4 kt with no wave data
    assert_eq!(update.advisory, Advisory::Advisory);
    assert_eq!(update.conditions.text, "Vent frais");
    assert_eq!(update.forecast.len(), 8);

    let snapshot = SnapshotCache::new(dir.path()).load().unwrap();
    assert_eq!(snapshot.location_id, "nord");
    assert_eq!(snapshot.observation, update.observation);
}

#[tokio::test]
async fn test_provider_outage_falls_back_to_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/point"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hourly_body()))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/weather/point"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dash = dashboard(dir.path(), &server.uri());

    let live = dash.on_refresh_requested().await.unwrap();
    assert_eq!(live.source, DataSource::Live);

    let degraded = dash.on_refresh_requested().await.unwrap();
    match &degraded.source {
        DataSource::Cached { reason, .. } => {
            assert_eq!(
                reason,
                &DegradedReason::FetchFailed("service météo indisponible".to_string())
            );
        }
        other => panic!("expected cached data, got {:?}", other),
    }
    assert_eq!(degraded.observation, live.observation);
    assert_eq!(dash.presenter().updates.lock().len(), 2);
}

#[tokio::test]
async fn test_invalid_key_without_snapshot_shows_demo() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/point"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dash = dashboard(dir.path(), &server.uri());

    let update = dash.on_refresh_requested().await.unwrap();
    assert_eq!(
        update.source,
        DataSource::Demo {
            reason: DegradedReason::FetchFailed("clé API invalide".to_string())
        }
    );
    assert!(update.source.banner(0).title.contains("démonstration"));
    assert!(SnapshotCache::new(dir.path()).load().is_none());
}

#[tokio::test]
async fn test_offline_after_live_uses_snapshot_then_export() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/point"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hourly_body()))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dash = dashboard(dir.path(), &server.uri());

    dash.on_refresh_requested().await.unwrap();
    let offline = dash.on_connectivity_changed(false).await.unwrap();
    assert!(matches!(
        offline.source,
        DataSource::Cached {
            reason: DegradedReason::Offline,
            ..
        }
    ));

    let export_path = dir.path().join("meteo.json");
    dash.export(&export_path).unwrap();
    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&export_path).unwrap()).unwrap();
    assert_eq!(exported["location"]["id"], "nord");
    assert_eq!(exported["source"]["kind"], "cached");
    assert_eq!(exported["observation"]["air_temp_c"], 0.0);
}
