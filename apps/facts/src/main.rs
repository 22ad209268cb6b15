use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{FactsDataSource, HttpFactsDataSource, RequestCoordinator, SearchAction};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

#[derive(Parser, Debug)]
#[command(name = "facts", about = "Look up facts by text, category or at random")]
struct Cli {
    /// Overrides the API base url from facts.toml and the environment.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Search { query: String },
    Category { name: String },
    Random,
    Categories,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = config::load_settings();
    if let Some(url) = cli.api_url {
        settings.api_base_url = config::normalize_base_url(&url);
    }
    if let Some(secs) = cli.timeout_secs {
        settings.request_timeout_secs = secs;
    }
    info!(api_base_url = %settings.api_base_url, "facts: starting");

    let data_source = Arc::new(
        HttpFactsDataSource::new(&settings.api_base_url, settings.request_timeout())
            .context("failed to set up the facts API client")?,
    );

    let action = match cli.command {
        Command::Search { query } => SearchAction::FreeText(query),
        Command::Category { name } => SearchAction::Category(name),
        Command::Random => SearchAction::Random,
        Command::Categories => {
            let categories = data_source
                .fetch_categories()
                .await
                .into_result()
                .context("failed to list categories")?;
            for category in categories {
                println!("{category}");
            }
            return Ok(());
        }
    };

    let coordinator = RequestCoordinator::with_capacity(data_source, settings.channel_capacity);
    let observer = tokio::spawn(render::observe(
        coordinator.subscribe_results(),
        coordinator.subscribe_panel(),
        coordinator.subscribe_connection(),
    ));

    coordinator.run(action).await;
    // Closing the channels lets the observer drain and return.
    drop(coordinator);
    observer.await.context("observer task failed")?;

    Ok(())
}
