use std::{io, path::Path};

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_ENV: &str = "FOCUSLINE_LOG";
pub const LOG_FILE: &str = "focusline.log";

fn filter(verbose: u8) -> EnvFilter {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level))
}

pub fn init_stderr(verbose: u8) {
    let _ = fmt()
        .with_env_filter(filter(verbose))
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Hold the guard until exit; dropping it flushes pending lines.
pub fn init_file(verbose: u8, dir: &Path) -> Option<WorkerGuard> {
    // Files get info by default even without -v.
    let filter = filter(verbose.max(1));
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(dir);

    match appender {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .try_init();
            Some(guard)
        }
        Err(_) => {
            let _ = fmt().with_env_filter(filter).with_writer(io::sink).try_init();
            None
        }
    }
}
