//! Write-only JSON export of the current view.

use chrono::{DateTime, Utc};
use meteomar_core::StorageError;
use serde::Serialize;
use std::path::Path;

use crate::advisory::Advisory;
use crate::dashboard::DashboardUpdate;
use crate::location::Location;
use crate::types::{DataSource, ForecastSeries, ObservationSet};

/// The document offered for download.
#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub exported_at: DateTime<Utc>,
    pub location: &'a Location,
    pub source: &'a DataSource,
    pub advisory: Advisory,
    pub observation: &'a ObservationSet,
    pub forecast: &'a ForecastSeries,
}

impl<'a> ExportDocument<'a> {
    pub fn from_update(update: &'a DashboardUpdate, exported_at: DateTime<Utc>) -> Self {
        Self {
            exported_at,
            location: &update.location,
            source: &update.source,
            advisory: update.advisory,
            observation: &update.observation,
            forecast: &update.forecast,
        }
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), StorageError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| StorageError::WriteFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::info!("Exported current view to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::advisory::{conditions_for, forecast_conditions};
    use crate::demo::{demo_forecast, demo_observation};
    use crate::location::get_location;
    use crate::types::DegradedReason;
    use chrono::TimeZone;
    use meteomar_core::Units;

    fn update() -> DashboardUpdate {
        let observation = demo_observation("quiberon", 10);
        DashboardUpdate {
            sequence: 1,
            location: *get_location("quiberon").unwrap(),
            source: DataSource::Demo {
                reason: DegradedReason::NoApiKey,
            },
            advisory: Advisory::Favorable,
            conditions: conditions_for(observation.wind_speed_kt),
            observation,
            forecast_conditions: forecast_conditions(&demo_forecast()),
            forecast: demo_forecast(),
            units: Units::Metric,
        }
    }

    #[test]
    fn test_export_document_shape() {
        let update = update();
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let json = ExportDocument::from_update(&update, at).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["location"]["id"], "quiberon");
        assert_eq!(value["location"]["name"], "Presqu'île de Quiberon");
        assert_eq!(value["source"]["kind"], "demo");
        assert_eq!(value["advisory"], "FAVORABLE");
        assert_eq!(value["observation"]["air_temp_c"], 20.0);
        assert_eq!(value["forecast"].as_array().unwrap().len(), 8);
        assert_eq!(value["exported_at"], "2024-06-01T12:00:00Z");
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        let update = update();
        ExportDocument::from_update(&update, Utc::now())
            .write_to(&path)
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"quiberon\""));
    }
}
