use std::sync::Arc;

use anyhow::{Context, Result};
use api::ApiState;
use auth::SessionStore;
use booking::cli::Cli;
use booking::{App, AssumeYes, Confirm, StdinConfirm};
use clap::Parser;
use common::{ClientConfig, FileTokenStorage};
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_tracing(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr so command output stays pipeable
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = ClientConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    debug!("Using backend {}", config.base_url);

    let storage = Arc::new(FileTokenStorage::new(&config.token_path));
    let session = SessionStore::new(storage);
    let state = ApiState::from_config(&config, session).context("Failed to create HTTP client")?;

    let confirm: Box<dyn Confirm> = if cli.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    };
    let app = App::new(state, config, confirm);

    match app.run(cli.command).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {:?}", e);
            Err(e.into())
        }
    }
}
