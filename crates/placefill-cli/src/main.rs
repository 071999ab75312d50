mod session;

use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use placefill_core::SearchConfig;
use placefill_places::GooglePlacesClient;
use placefill_resolver::{FallbackProvider, GazetteerEngine, ResolutionCoordinator, SearchEvents};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "placefill")]
#[command(about = "Address autocomplete over Google Places with an offline fallback")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one query and print the first candidate set
    Suggest {
        /// Partial address text
        text: String,
    },
    /// Resolve a Google place id into a structured address
    Resolve {
        /// Place id returned by a previous suggest
        place_id: String,
    },
    /// Type queries on stdin; `:pick N` selects, `:clear` clears
    Interactive,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = placefill_core::load_search_config().context("failed to load configuration")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(?config, "configuration loaded");
    let client = build_client(&config)?;

    match cli.command {
        Commands::Suggest { text } => {
            let (coordinator, events) = build_coordinator(&config, client)?;
            session::run_suggest(&coordinator, events, &text).await
        }
        Commands::Resolve { place_id } => session::run_resolve(&client, &place_id).await,
        Commands::Interactive => {
            let (coordinator, events) = build_coordinator(&config, client)?;
            eprintln!("{}", config.placeholder);
            session::run_interactive(&coordinator, events).await
        }
    }
}

fn build_client(config: &SearchConfig) -> anyhow::Result<GooglePlacesClient> {
    GooglePlacesClient::with_base_url(
        &config.api_key,
        config.request_timeout_secs,
        &config.places_base_url,
    )
    .context("failed to build Google Places client")
}

fn build_coordinator(
    config: &SearchConfig,
    client: GooglePlacesClient,
) -> anyhow::Result<(ResolutionCoordinator, SearchEvents)> {
    let gazetteer = match &config.gazetteer_path {
        Some(path) => GazetteerEngine::from_path(path)
            .with_context(|| format!("failed to load gazetteer {}", path.display()))?,
        None => GazetteerEngine::empty(),
    };

    Ok(ResolutionCoordinator::new(
        Arc::new(client),
        Arc::new(FallbackProvider::new(gazetteer)),
        config.scope,
    ))
}
