mod areas;
mod output;
mod shops;

use clap::{Parser, Subcommand};
use gourmet_hotpepper::HotpepperClient;
use tracing_subscriber::EnvFilter;

use crate::areas::AreaCommands;
use crate::shops::SearchArgs;

#[derive(Debug, Parser)]
#[command(name = "gourmet-cli")]
#[command(about = "Query the HotPepper Gourmet directory from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search shops by keyword, genre, area or location
    Search(SearchArgs),
    /// Show one shop by id
    Shop {
        /// HotPepper shop id (e.g., J001246910)
        id: String,
    },
    /// List genre master data
    Genres,
    /// List area master data
    Areas {
        #[command(subcommand)]
        command: AreaCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = gourmet_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = HotpepperClient::from_config(&config)?;

    match cli.command {
        Commands::Search(args) => shops::run_search(&client, &args).await,
        Commands::Shop { id } => shops::run_shop(&client, &id).await,
        Commands::Genres => shops::run_genres(&client).await,
        Commands::Areas { command } => {
            areas::run_areas(client, config.area_fetch_concurrency, command).await
        }
    }
}
