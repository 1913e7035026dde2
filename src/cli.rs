use clap::Parser;
use meteomar_core::{SettingsUpdate, Units};
use std::path::PathBuf;

/// Marine weather for the Brittany coast.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Location id to show (see --list-locations); persisted as the new default
    #[arg(short, long)]
    pub location: Option<String>,

    /// Treat the network as unavailable and use the cached snapshot or demo data
    #[arg(long)]
    pub offline: bool,

    /// Keep running and refresh periodically until Ctrl-C
    #[arg(short, long)]
    pub watch: bool,

    /// Write the displayed data as JSON to this file
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Store a Stormglass API key; an empty value clears it
    #[arg(long, value_name = "KEY")]
    pub set_api_key: Option<String>,

    /// Display units
    #[arg(long, value_parser = parse_units)]
    pub units: Option<Units>,

    /// Store the dark mode preference
    #[arg(long)]
    pub dark_mode: Option<bool>,

    /// Print the known locations and exit
    #[arg(long)]
    pub list_locations: bool,
}

fn parse_units(s: &str) -> Result<Units, String> {
    s.parse()
}

impl Cli {
    /// Settings changes requested on the command line, if any.
    pub fn settings_update(&self) -> Option<SettingsUpdate> {
        if self.set_api_key.is_none() && self.units.is_none() && self.dark_mode.is_none() {
            return None;
        }
        Some(SettingsUpdate {
            api_key: self.set_api_key.clone(),
            units: self.units,
            dark_mode: self.dark_mode,
        })
    }
}
