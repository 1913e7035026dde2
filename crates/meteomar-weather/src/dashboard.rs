//! Dashboard command interface.
//!
//! The host (terminal, GUI, ...) owns a [`Dashboard`] and calls its `on_*`
//! commands; results go out through a [`Presenter`]. Every refresh draws a
//! sequence number, and a result whose number has been superseded by a newer
//! refresh is dropped rather than presented.

use chrono::{Local, Timelike, Utc};
use meteomar_core::{Config, SettingsUpdate, Units};
use parking_lot::Mutex;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

use crate::advisory::{
    classify_observation, conditions_for, forecast_conditions, Advisory, ConditionsLabel,
};
use crate::cache::SnapshotCache;
use crate::demo::{demo_forecast, demo_observation};
use crate::error::DashboardError;
use crate::export::ExportDocument;
use crate::location::{default_location, get_location, Location};
use crate::normalize::{normalize_forecast, normalize_observation};
use crate::provider::WeatherProvider;
use crate::resolver::{resolve, Connectivity, SourceDecision};
use crate::types::{DataSource, DegradedReason, ForecastSeries, ObservationSet, Snapshot};

/// Receives every update the dashboard produces.
///
/// Called outside the dashboard's lock, but must not block for long.
pub trait Presenter: Send + Sync {
    fn present(&self, update: &DashboardUpdate);
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardUpdate {
    pub sequence: u64,
    pub location: Location,
    pub source: DataSource,
    pub observation: ObservationSet,
    pub forecast: ForecastSeries,
    pub advisory: Advisory,
    pub conditions: ConditionsLabel,
    /// One label per forecast point, in order
    pub forecast_conditions: Vec<ConditionsLabel>,
    pub units: Units,
}

/// Mutable application state, passed around explicitly instead of living in globals.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub location: &'static Location,
    pub connectivity: Connectivity,
    pub current: Option<DashboardUpdate>,
    issued_sequence: u64,
}

impl AppState {
    pub fn new(config: Config, connectivity: Connectivity) -> Self {
        let location = match get_location(&config.weather.location) {
            Some(location) => location,
            None => {
                tracing::warn!(
                    "Unknown location '{}' in config, using '{}'",
                    config.weather.location,
                    default_location().id
                );
                default_location()
            }
        };

        Self {
            config,
            location,
            connectivity,
            current: None,
            issued_sequence: 0,
        }
    }

    fn next_sequence(&mut self) -> u64 {
        self.issued_sequence += 1;
        self.issued_sequence
    }
}

/// Inputs of one refresh, captured under the lock.
struct RefreshPlan {
    sequence: u64,
    location: &'static Location,
    decision: SourceDecision,
    api_key: Option<String>,
    units: Units,
}

pub struct Dashboard<P: Presenter> {
    state: Mutex<AppState>,
    provider: WeatherProvider,
    cache: SnapshotCache,
    presenter: P,
}

impl<P: Presenter> Dashboard<P> {
    pub fn new(
        config: Config,
        connectivity: Connectivity,
        presenter: P,
    ) -> Result<Self, DashboardError> {
        let provider = WeatherProvider::from_config(&config.weather)?;
        let cache = SnapshotCache::new(&config.config_dir);

        Ok(Self {
            state: Mutex::new(AppState::new(config, connectivity)),
            provider,
            cache,
            presenter,
        })
    }

    /// Last presented update, if any.
    pub fn current(&self) -> Option<DashboardUpdate> {
        self.state.lock().current.clone()
    }

    pub fn location(&self) -> &'static Location {
        self.state.lock().location
    }

    pub fn config(&self) -> Config {
        self.state.lock().config.clone()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Period of the background refresh, `None` when disabled.
    pub fn refresh_period(&self) -> Option<Duration> {
        let minutes = self.state.lock().config.weather.refresh_minutes;
        (minutes > 0).then(|| Duration::from_secs(u64::from(minutes) * 60))
    }

    /// Switch to `location_id` and refresh.
    pub async fn on_location_selected(
        &self,
        location_id: &str,
    ) -> Result<Option<DashboardUpdate>, DashboardError> {
        let location = get_location(location_id)
            .ok_or_else(|| DashboardError::UnknownLocation(location_id.to_string()))?;

        {
            let mut state = self.state.lock();
            state.location = location;
            state.config.weather.location = location.id.to_string();
            if let Err(e) = state.config.save() {
                tracing::warn!("Failed to persist selected location: {:#}", e);
            }
        }

        tracing::info!(location = location.id, "Location selected");
        Ok(self.on_refresh_requested().await)
    }

    /// Record a connectivity change; refreshes only on an actual transition.
    pub async fn on_connectivity_changed(&self, is_online: bool) -> Option<DashboardUpdate> {
        let changed = {
            let mut state = self.state.lock();
            let changed = state.connectivity.is_online != is_online;
            state.connectivity = Connectivity { is_online };
            changed
        };

        if !changed {
            return None;
        }

        tracing::info!(is_online, "Connectivity changed");
        self.on_refresh_requested().await
    }

    /// Apply and persist a "save settings" action, then refresh.
    pub async fn save_settings(
        &self,
        update: SettingsUpdate,
    ) -> Result<Option<DashboardUpdate>, DashboardError> {
        {
            let mut state = self.state.lock();
            let mut config = state.config.clone();
            config.apply_settings(update);
            config
                .save()
                .map_err(|e| DashboardError::Settings(format!("{:#}", e)))?;
            state.config = config;
        }

        tracing::info!("Settings saved");
        Ok(self.on_refresh_requested().await)
    }

    /// Resolve the source, fetch or fall back, classify and present.
    ///
    /// Returns `None` when a newer refresh started before this one finished.
    pub async fn on_refresh_requested(&self) -> Option<DashboardUpdate> {
        let plan = {
            let mut state = self.state.lock();
            RefreshPlan {
                sequence: state.next_sequence(),
                location: state.location,
                decision: resolve(&state.config.weather, state.connectivity),
                api_key: state.config.weather.api_key().map(str::to_string),
                units: state.config.weather.units,
            }
        };

        tracing::info!(
            sequence = plan.sequence,
            location = plan.location.id,
            decision = ?plan.decision,
            "Refreshing"
        );

        let (source, observation, forecast, snapshot) = self.gather(&plan).await;

        let advisory = classify_observation(&observation);
        let update = DashboardUpdate {
            sequence: plan.sequence,
            location: *plan.location,
            conditions: conditions_for(observation.wind_speed_kt),
            forecast_conditions: forecast_conditions(&forecast),
            source,
            observation,
            forecast,
            advisory,
            units: plan.units,
        };

        {
            let mut state = self.state.lock();
            if state.issued_sequence != plan.sequence {
                tracing::debug!(
                    sequence = plan.sequence,
                    latest = state.issued_sequence,
                    "Discarding superseded refresh"
                );
                return None;
            }
            state.current = Some(update.clone());
        }

        if let Some(snapshot) = snapshot {
            if let Err(e) = self.cache.save(&snapshot) {
                tracing::warn!("Failed to save snapshot: {}", e);
            }
        }

        self.presenter.present(&update);
        Some(update)
    }

    /// Write the current view to `path` as JSON.
    pub fn export(&self, path: &Path) -> Result<(), DashboardError> {
        let current = self.current().ok_or(DashboardError::NothingToExport)?;
        ExportDocument::from_update(&current, Utc::now()).write_to(path)?;
        Ok(())
    }

    async fn gather(
        &self,
        plan: &RefreshPlan,
    ) -> (DataSource, ObservationSet, ForecastSeries, Option<Snapshot>) {
        let location = plan.location;

        let reason = match (plan.decision, plan.api_key.as_deref()) {
            (SourceDecision::Live, Some(api_key)) => {
                match self.provider.fetch_live(location, api_key).await {
                    Ok(payload) => {
                        let observation = normalize_observation(location.id, &payload.current);
                        let forecast = normalize_forecast(&payload.forecast);
                        let snapshot = Snapshot {
                            observation: observation.clone(),
                            forecast: forecast.clone(),
                            location_id: location.id.to_string(),
                            captured_at_epoch_ms: Utc::now().timestamp_millis(),
                        };
                        return (DataSource::Live, observation, forecast, Some(snapshot));
                    }
                    Err(e) => {
                        tracing::warn!(location = location.id, "Live fetch failed: {}", e);
                        DegradedReason::FetchFailed(e.degraded_reason().to_string())
                    }
                }
            }
            (SourceDecision::Cached, _) => DegradedReason::Offline,
            _ => DegradedReason::NoApiKey,
        };

        if reason != DegradedReason::NoApiKey {
            if let Some(snapshot) = self.cached_for(location) {
                return (
                    DataSource::Cached {
                        captured_at_epoch_ms: snapshot.captured_at_epoch_ms,
                        reason,
                    },
                    snapshot.observation,
                    snapshot.forecast,
                    None,
                );
            }
            tracing::info!(location = location.id, "No valid snapshot, showing demo data");
        }

        (
            DataSource::Demo { reason },
            demo_observation(location.id, Local::now().hour()),
            demo_forecast(),
            None,
        )
    }

    /// The cached snapshot, if fresh and for `location`.
    fn cached_for(&self, location: &Location) -> Option<Snapshot> {
        let snapshot = self.cache.load()?;
        if snapshot.location_id == location.id {
            Some(snapshot)
        } else {
            tracing::debug!(
                cached = %snapshot.location_id,
                wanted = location.id,
                "Snapshot is for another location"
            );
            None
        }
    }
}
