//! Raw provider payloads to the canonical display model.
//!
//! # Clock injection
//! The `*_at` / `*_in` variants take the current time or time zone
//! explicitly; the plain variants use the local clock.

use chrono::{DateTime, Local, TimeZone, Timelike};

use crate::raw::{scalar, RawHour, RawPayload};
use crate::types::{ForecastPoint, ForecastSeries, ObservationSet};

/// Provider wind speeds are m/s; the canonical model uses knots.
pub const MS_TO_KNOTS: f64 = 1.943_844;

/// Forecast sampling stride, in hourly records.
pub const FORECAST_STEP: usize = 3;

/// Maximum number of forecast cards.
pub const FORECAST_MAX_POINTS: usize = 8;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSO", "SO", "OSO", "O", "ONO", "NO",
    "NNO",
];

/// Build the current-conditions view using the local clock.
pub fn normalize_observation(location_id: &str, raw: &RawPayload) -> ObservationSet {
    normalize_observation_at(location_id, raw, &Local::now())
}

/// Build the current-conditions view for `now`.
///
/// Picks the record whose hour (in `now`'s time zone) equals the current
/// hour, else the first record. An empty payload yields an observation with
/// every value absent.
pub fn normalize_observation_at<Tz: TimeZone>(
    location_id: &str,
    raw: &RawPayload,
    now: &DateTime<Tz>,
) -> ObservationSet {
    let tz = now.timezone();
    let current_hour = now.hour();

    let matching = raw
        .hours
        .iter()
        .flatten()
        .find(|record| record_hour(record, &tz) == Some(current_hour));

    let selected = matching.or_else(|| raw.hours.iter().flatten().next());

    let Some(record) = selected else {
        tracing::debug!(location_id, "Empty payload, every value absent");
        return ObservationSet::empty(location_id, current_hour);
    };

    if matching.is_none() {
        tracing::debug!(location_id, current_hour, "No record for current hour, using first");
    }

    ObservationSet {
        location_id: location_id.to_string(),
        observed_at_hour: record_hour(record, &tz).unwrap_or(current_hour),
        air_temp_c: scalar(&record.air_temperature),
        water_temp_c: scalar(&record.water_temperature),
        wind_speed_kt: scalar(&record.wind_speed).map(ms_to_knots),
        wind_dir_deg: scalar(&record.wind_direction),
        wave_height_m: scalar(&record.wave_height),
        pressure_hpa: scalar(&record.pressure),
        visibility_km: scalar(&record.visibility),
    }
}

/// Build the forecast cards, labelling hours in local time.
pub fn normalize_forecast(raw: &RawPayload) -> ForecastSeries {
    normalize_forecast_in(raw, &Local)
}

/// Build the forecast cards, labelling hours in `tz`.
///
/// Samples indices 0, 3, 6, ... and keeps up to eight points. A missing
/// record does not consume a slot; neither does one without a timestamp or
/// wind speed, since a card cannot be drawn without them.
pub fn normalize_forecast_in<Tz: TimeZone>(raw: &RawPayload, tz: &Tz) -> ForecastSeries {
    let points = raw
        .hours
        .iter()
        .step_by(FORECAST_STEP)
        .filter_map(|slot| slot.as_ref())
        .filter_map(|record| forecast_point(record, tz))
        .take(FORECAST_MAX_POINTS)
        .collect();

    ForecastSeries::new(points)
}

fn forecast_point<Tz: TimeZone>(record: &RawHour, tz: &Tz) -> Option<ForecastPoint> {
    Some(ForecastPoint {
        hour_of_day: record_hour(record, tz)?,
        air_temp_c: scalar(&record.air_temperature),
        wind_speed_kt: ms_to_knots(scalar(&record.wind_speed)?),
        wave_height_m: scalar(&record.wave_height),
    })
}

fn record_hour<Tz: TimeZone>(record: &RawHour, tz: &Tz) -> Option<u32> {
    let time = record.time.as_deref()?;
    DateTime::parse_from_rfc3339(time)
        .ok()
        .map(|t| t.with_timezone(tz).hour())
}

pub fn ms_to_knots(ms: f64) -> f64 {
    ms * MS_TO_KNOTS
}

/// Map a bearing in degrees to one of the 16 French compass labels
/// (N, NNE, ..., SSO, SO, ..., NNO).
pub fn wind_dir_to_compass(degrees: f64) -> &'static str {
    if !degrees.is_finite() {
        return COMPASS_POINTS[0];
    }
    let index = ((degrees / 22.5).round() as i64).rem_euclid(16) as usize;
    COMPASS_POINTS[index]
}
