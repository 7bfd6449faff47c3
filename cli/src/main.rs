//! clusterlab command-line entry point
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

mod cli;
mod cloud;
mod config;
mod dbscan;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::{debug, info};

use crate::cli::{Cli, Commands};
use crate::config::FileConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    info!("clusterlab v{} starting", clusterlab_core::VERSION);
    let mut config = FileConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Dbscan(args) => {
            args.apply(&mut config);
            debug!("Configuration: {:?}", config.lab);
            dbscan::run(args, config).await
        }
        Commands::Cloud(args) => {
            args.apply(&mut config);
            debug!("Configuration: {:?}", config.cloud);
            cloud::run(args, config).await
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
        }
    }
    builder.init();
}
