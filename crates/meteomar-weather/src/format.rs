//! Display strings for the presentation layer. Absent values render as a placeholder.

use meteomar_core::Units;

use crate::normalize::wind_dir_to_compass;

pub const PLACEHOLDER: &str = "--";

const KNOTS_TO_MPH: f64 = 1.150_779;
const METRES_TO_FEET: f64 = 3.280_84;
const KM_TO_MILES: f64 = 0.621_371;

pub fn temperature(celsius: Option<f64>, units: Units) -> String {
    match (celsius, units) {
        (None, _) => PLACEHOLDER.to_string(),
        (Some(c), Units::Metric) => format!("{:.0}°C", c),
        (Some(c), Units::Imperial) => format!("{:.0}°F", c * 9.0 / 5.0 + 32.0),
    }
}

/// Wind speed with the compass label when the direction is known.
pub fn wind(speed_kt: Option<f64>, direction_deg: Option<f64>, units: Units) -> String {
    let Some(kt) = speed_kt else {
        return PLACEHOLDER.to_string();
    };
    let speed = match units {
        Units::Metric => format!("{:.0} nœuds", kt),
        Units::Imperial => format!("{:.0} mph", kt * KNOTS_TO_MPH),
    };
    match direction_deg {
        Some(deg) => format!("{} ({})", speed, wind_dir_to_compass(deg)),
        None => speed,
    }
}

pub fn wave_height(metres: Option<f64>, units: Units) -> String {
    match (metres, units) {
        (None, _) => PLACEHOLDER.to_string(),
        (Some(m), Units::Metric) => format!("{:.1} m", m),
        (Some(m), Units::Imperial) => format!("{:.1} ft", m * METRES_TO_FEET),
    }
}

pub fn pressure(hpa: Option<f64>) -> String {
    hpa.map_or_else(|| PLACEHOLDER.to_string(), |p| format!("{:.0} hPa", p))
}

pub fn visibility(km: Option<f64>, units: Units) -> String {
    match (km, units) {
        (None, _) => PLACEHOLDER.to_string(),
        (Some(v), Units::Metric) => format!("{:.1} km", v),
        (Some(v), Units::Imperial) => format!("{:.1} mi", v * KM_TO_MILES),
    }
}

/// Forecast card hour label, e.g. `08h`.
pub fn hour_label(hour: u32) -> String {
    format!("{:02}h", hour)
}
