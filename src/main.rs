//! Host bridge runner (default binary).
//!
//! Reads line-delimited JSON input from stdin and writes engine commands to
//! stdout. Logs go to stderr.
//!
//! Config path: first argument, else `MATCH_DROP_CONFIG`, else the built-in
//! animal-sound demo.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use match_drop::bridge::{self, BridgeConfig};
use match_drop::engine::{GameConfig, RoundController};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config()?.with_env_overrides();
    config.validate().context("invalid configuration")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    runtime.block_on(async move {
        let mut controller = RoundController::from_config(config);
        bridge::run(
            &mut controller,
            tokio::io::stdin(),
            tokio::io::stdout(),
            BridgeConfig::from_env(),
        )
        .await
    })
}

fn load_config() -> Result<GameConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("MATCH_DROP_CONFIG").ok())
        .filter(|p| !p.trim().is_empty());

    match path {
        Some(path) => {
            info!(path = %path, "loading config");
            GameConfig::load(&path).with_context(|| format!("failed to load config {}", path))
        }
        None => {
            info!("no config given; using the animal-sound demo");
            Ok(GameConfig::default())
        }
    }
}
