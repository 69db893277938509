use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// The interactive UI owns stdout and stderr, so without a log file nothing is
/// installed in that mode. One-shot modes log to stderr.
pub fn setup_logger(
    log_file: Option<&Path>,
    interactive: bool,
    default_level: &str,
) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .compact()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|err| anyhow!(err.to_string()))
        }
        None if interactive => Ok(()),
        None => tracing_subscriber::fmt()
            .with_target(true)
            .with_level(true)
            .compact()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| anyhow!(err.to_string())),
    }
}
