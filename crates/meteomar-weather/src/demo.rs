//! Synthetic demo data, shown without an API key or when nothing better exists.

use crate::location::default_location;
use crate::types::{ForecastPoint, ForecastSeries, ObservationSet};

struct DemoSite {
    id: &'static str,
    air_temp_c: f64,
    water_temp_c: f64,
    wind_speed_kt: f64,
    wind_dir_deg: f64,
    wave_height_m: f64,
    pressure_hpa: f64,
    visibility_km: f64,
}

const DEMO_SITES: [DemoSite; 6] = [
    DemoSite {
        id: "nord",
        air_temp_c: 16.0,
        water_temp_c: 15.0,
        wind_speed_kt: 14.0,
        wind_dir_deg: 315.0,
        wave_height_m: 1.8,
        pressure_hpa: 1015.0,
        visibility_km: 12.0,
    },
    DemoSite {
        id: "sud",
        air_temp_c: 19.0,
        water_temp_c: 17.0,
        wind_speed_kt: 8.0,
        wind_dir_deg: 135.0,
        wave_height_m: 0.8,
        pressure_hpa: 1020.0,
        visibility_km: 20.0,
    },
    DemoSite {
        id: "morlaix",
        air_temp_c: 15.0,
        water_temp_c: 14.0,
        wind_speed_kt: 22.0,
        wind_dir_deg: 270.0,
        wave_height_m: 2.5,
        pressure_hpa: 1010.0,
        visibility_km: 8.0,
    },
    DemoSite {
        id: "brest",
        air_temp_c: 17.0,
        water_temp_c: 16.0,
        wind_speed_kt: 16.0,
        wind_dir_deg: 225.0,
        wave_height_m: 1.5,
        pressure_hpa: 1013.0,
        visibility_km: 15.0,
    },
    DemoSite {
        id: "quiberon",
        air_temp_c: 20.0,
        water_temp_c: 18.0,
        wind_speed_kt: 10.0,
        wind_dir_deg: 90.0,
        wave_height_m: 1.0,
        pressure_hpa: 1018.0,
        visibility_km: 18.0,
    },
    DemoSite {
        id: "finistere",
        air_temp_c: 14.0,
        water_temp_c: 13.0,
        wind_speed_kt: 28.0,
        wind_dir_deg: 292.5,
        wave_height_m: 3.5,
        pressure_hpa: 1008.0,
        visibility_km: 6.0,
    },
];

/// (hour, air °C, wind kt, waves m)
const DEMO_FORECAST: [(u32, f64, f64, f64); 8] = [
    (14, 16.0, 12.0, 1.2),
    (17, 15.0, 14.0, 1.4),
    (20, 14.0, 16.0, 1.6),
    (23, 13.0, 18.0, 1.8),
    (2, 12.0, 20.0, 2.0),
    (5, 12.0, 19.0, 1.9),
    (8, 14.0, 15.0, 1.5),
    (11, 16.0, 13.0, 1.3),
];

/// Demo conditions for `location_id`; unknown ids get the default site's values.
pub fn demo_observation(location_id: &str, hour: u32) -> ObservationSet {
    let site = DEMO_SITES
        .iter()
        .find(|site| site.id == location_id)
        .or_else(|| DEMO_SITES.iter().find(|site| site.id == default_location().id))
        .unwrap_or(&DEMO_SITES[0]);

    ObservationSet {
        location_id: location_id.to_string(),
        observed_at_hour: hour,
        air_temp_c: Some(site.air_temp_c),
        water_temp_c: Some(site.water_temp_c),
        wind_speed_kt: Some(site.wind_speed_kt),
        wind_dir_deg: Some(site.wind_dir_deg),
        wave_height_m: Some(site.wave_height_m),
        pressure_hpa: Some(site.pressure_hpa),
        visibility_km: Some(site.visibility_km),
    }
}

/// The fixed eight-card demo forecast.
pub fn demo_forecast() -> ForecastSeries {
    ForecastSeries::new(
        DEMO_FORECAST
            .iter()
            .map(|&(hour_of_day, air, wind, waves)| ForecastPoint {
                hour_of_day,
                air_temp_c: Some(air),
                wind_speed_kt: wind,
                wave_height_m: Some(waves),
            })
            .collect(),
    )
}
