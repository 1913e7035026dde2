//! Provider payload shapes.
//!
//! The provider has shipped several variants of the same hourly document:
//! scalars may be bare numbers, `null`, or objects keyed by source tag
//! (`{"sg": 12.1, "noaa": 11.8}`), and field names appear in camelCase or
//! snake_case. Everything here is lenient; interpretation happens in
//! [`crate::normalize`].

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Source tags in order of preference when a scalar carries several.
pub const SOURCE_PREFERENCE: &[&str] = &[
    "sg", "noaa", "meteo", "icon", "dwd", "meto", "ecmwf", "fcoo", "fmi", "yr", "smhi",
];

/// A raw hourly document as returned by one provider query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPayload {
    /// Hourly records; `null` entries are kept so indices line up with hours.
    #[serde(default, alias = "data")]
    pub hours: Vec<Option<RawHour>>,

    #[serde(default)]
    pub meta: Option<RawMeta>,
}

/// Request accounting the provider attaches to each response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMeta {
    #[serde(default)]
    pub cost: Option<u32>,
    #[serde(default)]
    pub daily_quota: Option<u32>,
    #[serde(default)]
    pub request_count: Option<u32>,
}

impl RawMeta {
    /// Requests left today, when the provider reports both counters.
    pub fn remaining(&self) -> Option<u32> {
        Some(self.daily_quota?.saturating_sub(self.request_count?))
    }
}

/// One hourly record. Every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHour {
    /// ISO-8601 timestamp, parsed during normalization
    #[serde(default)]
    pub time: Option<String>,

    #[serde(default, alias = "air_temperature")]
    pub air_temperature: Option<RawScalar>,

    #[serde(default, alias = "water_temperature", alias = "seaTemperature")]
    pub water_temperature: Option<RawScalar>,

    /// Metres per second
    #[serde(default, alias = "wind_speed")]
    pub wind_speed: Option<RawScalar>,

    #[serde(default, alias = "wind_direction")]
    pub wind_direction: Option<RawScalar>,

    #[serde(default, alias = "wave_height")]
    pub wave_height: Option<RawScalar>,

    #[serde(default)]
    pub pressure: Option<RawScalar>,

    #[serde(default)]
    pub visibility: Option<RawScalar>,
}

/// A scalar that is either a bare number or a map of source tag to value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Plain(f64),
    Sourced(BTreeMap<String, Value>),
}

impl RawScalar {
    /// The numeric value, or `None` when no source reported one.
    ///
    /// Zero is a value like any other.
    pub fn value(&self) -> Option<f64> {
        match self {
            RawScalar::Plain(v) => Some(*v).filter(|v| v.is_finite()),
            RawScalar::Sourced(sources) => SOURCE_PREFERENCE
                .iter()
                .filter_map(|tag| sources.get(*tag))
                .chain(sources.values())
                .find_map(numeric),
        }
    }
}

fn numeric(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

/// Read an optional scalar, treating "missing field" and "no value" alike.
pub fn scalar(field: &Option<RawScalar>) -> Option<f64> {
    field.as_ref().and_then(RawScalar::value)
}
