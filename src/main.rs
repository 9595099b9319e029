use afritax::core::log::init_logging;
use afritax::core::{Country, Structure};
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the tax comparison once for a monthly volume
    Calc {
        /// Monthly stablecoin volume in USD (non-numeric or negative counts as 0)
        #[arg(allow_negative_numbers = true)]
        volume: String,
        /// Country, e.g. "Nigeria" or "south-africa"
        #[arg(long)]
        country: Option<Country>,
        /// Current structure label or key (direct-bank, fintech, cex-ramp, defi)
        #[arg(long)]
        structure: Option<Structure>,
    },
    /// Keep the dashboard open with live price refreshes
    Watch {
        /// Monthly stablecoin volume in USD
        #[arg(allow_negative_numbers = true)]
        volume: Option<String>,
        #[arg(long)]
        country: Option<Country>,
        #[arg(long)]
        structure: Option<Structure>,
    },
    /// List country tax rates and business structures
    Countries,
}

impl From<Commands> for afritax::AppCommand {
    fn from(cmd: Commands) -> afritax::AppCommand {
        match cmd {
            Commands::Calc {
                volume,
                country,
                structure,
            } => afritax::AppCommand::Calc {
                volume,
                country,
                structure,
            },
            Commands::Watch {
                volume,
                country,
                structure,
            } => afritax::AppCommand::Watch {
                volume,
                country,
                structure,
            },
            Commands::Countries => afritax::AppCommand::Countries,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => afritax::cli::setup::setup(),
        Some(cmd) => afritax::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
