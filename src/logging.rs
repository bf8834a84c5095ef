//! Logging initialization
//!
//! The terminal belongs to the UI, so log output goes to
//! `~/.bizdash/bizdash.log`. Filter directives come from `BIZDASH_LOG`
//! and default to `info`.

use crate::config::Config;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_ENV: &str = "BIZDASH_LOG";
const LOG_FILE: &str = "bizdash.log";
const DEFAULT_FILTER: &str = "info";

fn filter() -> EnvFilter {
    filter_from(std::env::var(LOG_ENV).ok().as_deref())
}

/// Unset, blank or unparsable directives fall back to `info`
fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global tracing subscriber.
///
/// Logging is skipped, not fatal, when the log file cannot be opened.
pub fn init() {
    let Some(dir) = Config::config_dir() else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
    {
        Ok(file) => file,
        Err(_) => return,
    };

    let _ = fmt()
        .with_env_filter(filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}
