mod api;
mod app;
mod cache;
mod cart;
mod cli;
mod commands;
mod config;
mod event;
mod forms;
mod logging;
mod store;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::api::RentalApiClient;
use crate::cache::{Clock, SystemClock};
use crate::cli::CliCommand;
use crate::config::Config;
use crate::store::{Resource, Store};

#[derive(Parser, Debug)]
#[command(name = "rentacar")]
#[command(about = "A terminal catalog for a car-rental API")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/rentacar/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Base URL of the rental API (overrides the config file)
  #[arg(short, long)]
  url: Option<String>,

  /// Catalog shown on startup
  #[arg(short, long, value_enum)]
  resource: Option<Resource>,

  #[command(subcommand)]
  command: Option<CliCommand>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;
  let _log_guard = logging::init()?;

  let args = Args::parse();

  // Load configuration; --url alone is enough to run
  let mut config = Config::load_with_url(args.config.as_deref(), args.url.as_deref())?;
  if let Some(resource) = args.resource {
    config.default_resource = resource;
  }

  let token = Config::get_api_token();
  let client = RentalApiClient::new(&config.api, token.as_deref())?;
  let clock: Arc<dyn Clock> = Arc::new(SystemClock);
  let mut store = Store::new(&client, clock.clone(), config.cache.single_flight);

  info!(url = %config.api.url, single_flight = config.cache.single_flight, "starting");

  if let Some(command) = args.command {
    return cli::run(command, &mut store, &client).await;
  }

  let title = config.title.clone().unwrap_or_else(|| client.host().to_string());
  let mut app = app::App::new(title, config.default_resource, store, client, clock);
  app.run().await?;

  Ok(())
}
