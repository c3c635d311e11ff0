mod app;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::Context;
use engine_logging::engine_info;
use log::LevelFilter;

use config::ConfigSource;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let (config, source) = config::load(config_path.as_deref())?;

    logging::initialize(config.log_destination, &config.log_file, LevelFilter::Info);
    match &source {
        ConfigSource::File(path) => engine_info!("Loaded configuration from {:?}", path),
        ConfigSource::Defaults(path) => {
            engine_info!("No configuration at {:?}; using defaults", path)
        }
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    let summary = runtime.block_on(app::run(&config))?;

    println!("\n{summary}");
    Ok(())
}
