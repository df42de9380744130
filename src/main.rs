mod app;
mod cli;
mod config;
mod constants;
mod domain;
mod error;
mod logging;
mod stats;
mod storage;
mod time_format;
mod timer;

use std::sync::Arc;

use clap::Parser;
use tracing::{error, warn};

use crate::{
    cli::Cli,
    config::Config,
    storage::{FileStore, MemoryStore, SharedStore},
};

fn main() {
    let cli = Cli::parse();
    let config = Config::resolve(cli.data_dir.clone());

    match cli.command {
        Some(command) => {
            logging::init_stderr(cli.verbose);
            let store = open_store(&config);
            if let Err(e) = cli::run_command(&store, command) {
                error!(error = %e, "command failed");
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            let _guard = logging::init_file(cli.verbose, &config.log_dir());
            let store = match FileStore::open(&config.data_dir) {
                Ok(store) => Arc::new(store) as SharedStore,
                Err(e) => {
                    warn!(error = %e, "data dir unavailable, nothing will be saved");
                    Arc::new(MemoryStore::new())
                }
            };
            if let Err(e) = app::run_ui(&config, store) {
                error!(error = %e, "terminal ui failed");
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn open_store(config: &Config) -> SharedStore {
    match FileStore::open(&config.data_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
