use chrono::Utc;
use meteomar_weather::format;
use meteomar_weather::{DashboardUpdate, Presenter};

/// Prints each update to stdout.
pub struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn present(&self, update: &DashboardUpdate) {
        tracing::debug!(sequence = update.sequence, "Presenting update");
        println!("{}", render(update, Utc::now().timestamp_millis()));
    }
}

fn render(update: &DashboardUpdate, now_epoch_ms: i64) -> String {
    let obs = &update.observation;
    let units = update.units;
    let banner = update.source.banner(now_epoch_ms);

    let mut out = String::new();
    out.push_str(&format!("{}\n{}\n\n", banner.title, banner.text));
    out.push_str(&format!(
        "{} ({})  {}\n",
        update.location.name,
        format::hour_label(obs.observed_at_hour),
        update.conditions.text
    ));
    out.push_str(&format!("  Air       {}\n", format::temperature(obs.air_temp_c, units)));
    out.push_str(&format!("  Eau       {}\n", format::temperature(obs.water_temp_c, units)));
    out.push_str(&format!(
        "  Vent      {}\n",
        format::wind(obs.wind_speed_kt, obs.wind_dir_deg, units)
    ));
    out.push_str(&format!("  Vagues    {}\n", format::wave_height(obs.wave_height_m, units)));
    out.push_str(&format!("  Pression  {}\n", format::pressure(obs.pressure_hpa)));
    out.push_str(&format!("  Visibilité {}\n\n", format::visibility(obs.visibility_km, units)));
    out.push_str(&format!(
        "{}: {}\n",
        update.advisory.title(),
        update.advisory.description()
    ));

    if !update.forecast.is_empty() {
        out.push_str("\nPrévisions\n");
        for (point, conditions) in update.forecast.iter().zip(&update.forecast_conditions) {
            out.push_str(&format!(
                "  {}  {:>8}  {:>10}  {:>7}  {}\n",
                format::hour_label(point.hour_of_day),
                format::temperature(point.air_temp_c, units),
                format::wind(Some(point.wind_speed_kt), None, units),
                format::wave_height(point.wave_height_m, units),
                conditions.text
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use meteomar_core::Units;
    use meteomar_weather::demo::{demo_forecast, demo_observation};
    use meteomar_weather::{
        classify_observation, forecast_conditions, get_location, ConditionsLabel, DataSource,
        DegradedReason,
    };

    #[test]
    fn test_render_demo_update() {
        let observation = demo_observation("brest", 9);
        let update = DashboardUpdate {
            sequence: 1,
            location: *get_location("brest").unwrap(),
            source: DataSource::Demo {
                reason: DegradedReason::NoApiKey,
            },
            advisory: classify_observation(&observation),
            conditions: ConditionsLabel {
                text: "Jolie brise",
                icon_key: "cloud",
            },
            observation,
            forecast_conditions: forecast_conditions(&demo_forecast()),
            forecast: demo_forecast(),
            units: Units::Metric,
        };

        let text = render(&update, 0);
        assert!(text.contains("Mode démonstration"));
        assert!(text.contains("Rade de Brest (09h)"));
        assert!(text.contains("Prévisions"));
        assert!(text.contains("nœuds"));
        // 02h demo card: 20 kt
        assert!(text
            .lines()
            .any(|line| line.starts_with("  02h") && line.ends_with("Vent frais")));
    }
}
