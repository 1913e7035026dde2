//! Marine weather pipeline for Meteomar.
//!
//! Decides between live provider data, the offline snapshot and demo data,
//! normalizes provider payloads into a stable display model and classifies
//! sea conditions into advisory tiers.

pub mod advisory;
pub mod cache;
pub mod dashboard;
pub mod demo;
pub mod error;
pub mod export;
pub mod format;
pub mod location;
pub mod normalize;
pub mod provider;
pub mod raw;
pub mod resolver;
pub mod scheduler;
pub mod types;

pub use advisory::{
    classify, classify_observation, conditions_label, forecast_conditions, Advisory,
    ConditionsLabel,
};
pub use cache::SnapshotCache;
pub use dashboard::{AppState, Dashboard, DashboardUpdate, Presenter};
pub use error::{DashboardError, FetchError};
pub use export::ExportDocument;
pub use location::{all_locations, get_location, Location};
pub use normalize::{normalize_forecast, normalize_observation, wind_dir_to_compass};
pub use provider::WeatherProvider;
pub use resolver::{resolve, Connectivity, SourceDecision};
pub use scheduler::spawn_periodic_refresh;
pub use types::*;
