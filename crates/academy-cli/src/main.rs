//! Cadet Academy terminal entry point.

use std::error::Error;

use academy_cli::config::{AppConfig, LogFormat};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;

    // Logs go to stderr so they never interleave with the game frame.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match config.log_format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
    }

    tracing::info!(save_path = %config.save_path.display(), "starting Cadet Academy");

    academy_cli::app::run(config).await?;
    Ok(())
}
