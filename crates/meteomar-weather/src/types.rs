use serde::{Deserialize, Serialize};

/// Current conditions at one location, in canonical units.
///
/// Every measurement is independently optional; `None` means "no data" and
/// is never the same thing as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationSet {
    pub location_id: String,
    /// Local hour of day (0-23) of the record the values came from
    pub observed_at_hour: u32,
    pub air_temp_c: Option<f64>,
    pub water_temp_c: Option<f64>,
    pub wind_speed_kt: Option<f64>,
    pub wind_dir_deg: Option<f64>,
    pub wave_height_m: Option<f64>,
    pub pressure_hpa: Option<f64>,
    pub visibility_km: Option<f64>,
}

impl ObservationSet {
    /// An observation with every measurement absent.
    pub fn empty(location_id: &str, observed_at_hour: u32) -> Self {
        Self {
            location_id: location_id.to_string(),
            observed_at_hour,
            air_temp_c: None,
            water_temp_c: None,
            wind_speed_kt: None,
            wind_dir_deg: None,
            wave_height_m: None,
            pressure_hpa: None,
            visibility_km: None,
        }
    }
}

/// One forecast card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub hour_of_day: u32,
    pub air_temp_c: Option<f64>,
    pub wind_speed_kt: f64,
    pub wave_height_m: Option<f64>,
}

/// Ordered forecast points, at most [`crate::normalize::FORECAST_MAX_POINTS`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastSeries {
    pub points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    pub fn new(points: Vec<ForecastPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForecastPoint> {
        self.points.iter()
    }
}

/// Last successful live result, persisted for offline viewing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub observation: ObservationSet,
    pub forecast: ForecastSeries,
    pub location_id: String,
    pub captured_at_epoch_ms: i64,
}

/// Why the dashboard is not showing live data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradedReason {
    NoApiKey,
    Offline,
    FetchFailed(String),
}

impl DegradedReason {
    fn describe(&self) -> String {
        match self {
            DegradedReason::NoApiKey => "aucune clé API".to_string(),
            DegradedReason::Offline => "hors ligne".to_string(),
            DegradedReason::FetchFailed(reason) => reason.clone(),
        }
    }
}

/// Where the data on screen came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    Live,
    Cached {
        captured_at_epoch_ms: i64,
        reason: DegradedReason,
    },
    Demo {
        reason: DegradedReason,
    },
}

/// Title and body of the status banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub title: String,
    pub text: String,
}

impl DataSource {
    pub fn is_degraded(&self) -> bool {
        !matches!(self, DataSource::Live)
    }

    /// Banner describing the source, given the current time for cache age.
    pub fn banner(&self, now_epoch_ms: i64) -> Banner {
        match self {
            DataSource::Live => Banner {
                title: "✅ Données temps réel".to_string(),
                text: "Mise à jour via Stormglass API".to_string(),
            },
            DataSource::Cached {
                captured_at_epoch_ms,
                reason,
            } => {
                let age_minutes = (now_epoch_ms - captured_at_epoch_ms).max(0) / 60_000;
                Banner {
                    title: "📦 Données en cache".to_string(),
                    text: format!(
                        "Dernières données reçues il y a {} min ({})",
                        age_minutes,
                        reason.describe()
                    ),
                }
            }
            DataSource::Demo {
                reason: DegradedReason::NoApiKey,
            } => Banner {
                title: "🎭 Mode démonstration".to_string(),
                text: "Configurez votre clé API Stormglass pour les données réelles".to_string(),
            },
            DataSource::Demo { reason } => Banner {
                title: "🎭 Mode démonstration".to_string(),
                text: format!(
                    "Données réelles indisponibles ({}) et aucun cache récent",
                    reason.describe()
                ),
            },
        }
    }
}
