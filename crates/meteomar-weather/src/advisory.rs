//! Sea-state advisory tiers and wind descriptions.
//!
//! Thresholds are strict: a value exactly on a boundary stays in the lower
//! tier (30 kt is CAUTION, not DANGER).

use serde::{Deserialize, Serialize};

use crate::types::{ForecastSeries, ObservationSet};

/// Advisory severity, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Advisory {
    Favorable,
    Advisory,
    Caution,
    Danger,
}

impl Advisory {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Favorable => "Conditions favorables",
            Self::Advisory => "Vigilance",
            Self::Caution => "Prudence",
            Self::Danger => "Danger",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Favorable => "Mer calme, conditions idéales pour la navigation.",
            Self::Advisory => "Mer agitée par endroits, restez attentifs.",
            Self::Caution => "Vent fort ou houle marquée, sorties réservées aux équipages aguerris.",
            Self::Danger => "Tempête ou forte houle, sortie en mer déconseillée.",
        }
    }

    /// Icon key for the presentation layer
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Favorable => "check_circle",
            Self::Advisory => "info",
            Self::Caution => "warning",
            Self::Danger => "octagon_alert",
        }
    }
}

/// Classify wind (knots) and wave height (metres). The worse input wins.
pub fn classify(wind_speed_kt: f64, wave_height_m: f64) -> Advisory {
    if wind_speed_kt > 30.0 || wave_height_m > 4.0 {
        Advisory::Danger
    } else if wind_speed_kt > 20.0 || wave_height_m > 2.5 {
        Advisory::Caution
    } else if wind_speed_kt > 10.0 || wave_height_m > 1.5 {
        Advisory::Advisory
    } else {
        Advisory::Favorable
    }
}

/// Classify an observation. An absent measurement cannot raise the tier.
pub fn classify_observation(observation: &ObservationSet) -> Advisory {
    classify(
        observation.wind_speed_kt.unwrap_or(f64::NAN),
        observation.wave_height_m.unwrap_or(f64::NAN),
    )
}

/// Descriptive wind tier shown next to the current conditions and on forecast cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConditionsLabel {
    pub text: &'static str,
    pub icon_key: &'static str,
}

/// Upper bounds (inclusive) of the four lower tiers, in knots.
pub const CONDITION_BREAKPOINTS_KT: [f64; 4] = [3.0, 8.0, 15.0, 22.0];

const CONDITION_TIERS: [ConditionsLabel; 5] = [
    ConditionsLabel {
        text: "Calme",
        icon_key: "sun",
    },
    ConditionsLabel {
        text: "Petite brise",
        icon_key: "cloud_sun",
    },
    ConditionsLabel {
        text: "Jolie brise",
        icon_key: "cloud",
    },
    ConditionsLabel {
        text: "Vent frais",
        icon_key: "wind",
    },
    ConditionsLabel {
        text: "Coup de vent",
        icon_key: "cloud_lightning",
    },
];

const UNKNOWN_CONDITIONS: ConditionsLabel = ConditionsLabel {
    text: "Conditions inconnues",
    icon_key: "question",
};

/// Bucket a wind speed into one of five calm-to-storm tiers.
///
/// A non-finite speed gets the neutral "unknown" label.
pub fn conditions_label(wind_speed_kt: f64) -> ConditionsLabel {
    if !wind_speed_kt.is_finite() {
        return UNKNOWN_CONDITIONS;
    }
    let tier = CONDITION_BREAKPOINTS_KT
        .iter()
        .position(|limit| wind_speed_kt <= *limit)
        .unwrap_or(CONDITION_BREAKPOINTS_KT.len());
    CONDITION_TIERS[tier]
}

/// Same as [`conditions_label`], with a neutral label when wind is unknown.
pub fn conditions_for(wind_speed_kt: Option<f64>) -> ConditionsLabel {
    wind_speed_kt.map_or(UNKNOWN_CONDITIONS, conditions_label)
}

/// One label per forecast card, using the same breakpoints as the current conditions.
pub fn forecast_conditions(forecast: &ForecastSeries) -> Vec<ConditionsLabel> {
    forecast
        .iter()
        .map(|point| conditions_label(point.wind_speed_kt))
        .collect()
}
