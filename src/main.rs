use anyhow::Context;
use clap::Parser;
use meteomar_core::{AppError, Config, ConfigError};
use meteomar_weather::{all_locations, spawn_periodic_refresh, Connectivity, Dashboard};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

mod cli;
mod terminal;

use cli::Cli;
use terminal::TerminalPresenter;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = meteomar_core::init() {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli) -> Result<(), AppError> {
    if args.list_locations {
        for location in all_locations() {
            println!(
                "{:<10} {} ({:.4}, {:.4})",
                location.id, location.name, location.latitude, location.longitude
            );
        }
        return Ok(());
    }

    let (config, _) = Config::load_validated().map_err(|e| match e.downcast::<ConfigError>() {
        Ok(invalid) => AppError::Config(invalid),
        Err(other) => AppError::Other(other),
    })?;
    tracing::info!("Config directory: {}", config.config_dir.display());

    let connectivity = if args.offline {
        Connectivity::offline()
    } else {
        Connectivity::online()
    };
    let dashboard = Arc::new(Dashboard::new(config, connectivity, TerminalPresenter)?);

    let mut refreshed = false;
    if let Some(update) = args.settings_update() {
        dashboard.save_settings(update).await?;
        refreshed = true;
    }
    if let Some(location_id) = &args.location {
        dashboard.on_location_selected(location_id).await?;
        refreshed = true;
    }
    if !refreshed {
        dashboard.on_refresh_requested().await;
    }

    if let Some(path) = &args.export {
        dashboard.export(path)?;
        println!("Exported to {}", path.display());
    }

    if args.watch {
        let Some(period) = dashboard.refresh_period() else {
            tracing::warn!("Periodic refresh is disabled (refresh_minutes = 0)");
            return Ok(());
        };

        let cancel = CancellationToken::new();
        let handle = spawn_periodic_refresh(dashboard.clone(), period, cancel.clone());

        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl-C")?;
        tracing::info!("Shutting down");
        cancel.cancel();
        handle.await.context("Refresh task panicked")?;
    }

    Ok(())
}
