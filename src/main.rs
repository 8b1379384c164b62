// src/main.rs
use anyhow::Context;
use std::path::PathBuf;

use wild_island::{settings::CONFIG_FILE, WildIslandApp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    log::info!("Using configuration {}", config_path.display());

    let asset_root = std::env::current_dir().context("cannot resolve working directory")?;
    let app = WildIslandApp::new(config_path, asset_root)?;
    app.run().context("Wild Island stopped with an error")
}
