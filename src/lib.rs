pub mod cli;
pub mod core;
pub mod poller;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::tax::parse_volume;
use crate::core::{CalculationInput, Country, Structure};
use crate::providers::CoinGeckoProvider;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Render the dashboard once.
    Calc {
        volume: String,
        country: Option<Country>,
        structure: Option<Structure>,
    },
    /// Keep the dashboard live with periodic price refreshes.
    Watch {
        volume: Option<String>,
        country: Option<Country>,
        structure: Option<Structure>,
    },
    Countries,
}

fn build_input(
    config: &AppConfig,
    volume: Option<&str>,
    country: Option<Country>,
    structure: Option<Structure>,
) -> CalculationInput {
    CalculationInput::new(
        volume.map_or(0.0, parse_volume),
        country.unwrap_or(config.country),
        structure.unwrap_or(config.structure),
    )
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Tax leakage dashboard starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Calc {
            volume,
            country,
            structure,
        } => {
            let input = build_input(&config, Some(volume.as_str()), country, structure);
            let provider = CoinGeckoProvider::new(config.coingecko_base_url())?;
            cli::calc::run(&config, input, &provider).await
        }
        AppCommand::Watch {
            volume,
            country,
            structure,
        } => {
            let input = build_input(&config, volume.as_deref(), country, structure);
            let provider = Arc::new(CoinGeckoProvider::new(config.coingecko_base_url())?);
            cli::watch::run(&config, input, provider).await
        }
        AppCommand::Countries => {
            cli::countries::run();
            Ok(())
        }
    }
}
