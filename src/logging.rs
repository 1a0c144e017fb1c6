//! Tracing setup.
//!
//! Console output goes to stderr and is filtered by `KEYGRID_LOG`
//! (`KEYGRID_LOG=debug`, `KEYGRID_LOG=keygrid::sequence=trace`), defaulting
//! to `warn`. When a log directory is given, a daily-rolling `keygrid.log`
//! is written there at debug level.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "KEYGRID_LOG";
const LOG_FILE_NAME: &str = "keygrid.log";

pub fn init(log_dir: Option<PathBuf>) {
    let console_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_filter(console_filter);

    let file_layer = match log_dir.map(ensure_dir).transpose() {
        Ok(Some(dir)) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            Some(
                fmt::layer()
                    .with_writer(appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Ok(None) => None,
        Err(err) => {
            eprintln!("warning: file logging disabled: {err}");
            None
        }
    };

    let result = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
    if let Err(err) = result {
        eprintln!("warning: tracing already initialized: {err}");
    }
}

fn ensure_dir(dir: PathBuf) -> io::Result<PathBuf> {
    fs::create_dir_all(&dir)?;
    Ok(dir)
}
