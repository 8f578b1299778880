use std::{fmt::Display, str::FromStr};

use anyhow::{Error, Result};
use backtrace::Backtrace;
use tracing::{debug, error, info, level_filters::LevelFilter, trace, warn};

/// Installs the global fmt subscriber. Fails on an unknown level filter or
/// when a subscriber is already installed for this process.
pub fn init(display_level: &bool, level_filter: &str) -> Result<()> {
    let level_filter = parse_level_filter(level_filter)?;

    tracing_subscriber::fmt()
        .with_level(*display_level)
        .with_max_level(level_filter)
        .try_init()
        .map_err(|err| Error::msg(format!("Failed to install log subscriber: {err}")))
}

pub fn parse_level_filter(level_filter: &str) -> Result<LevelFilter> {
    LevelFilter::from_str(level_filter)
        .map_err(|err| Error::msg(format!("Invalid log level filter '{level_filter}': {err}")))
}

// Each line reads "<icon> [<component>] <msg>".

pub fn trace<T: Display>(component: &str, msg: T) {
    trace!("🐾 [{component}] {msg}");
}

pub fn debug<T: Display>(component: &str, msg: T) {
    debug!("🐞 [{component}] {msg}");
}

pub fn info<T: Display>(component: &str, msg: T) {
    info!("📢 [{component}] {msg}");
}

pub fn warn<T: Display>(component: &str, msg: T) {
    warn!("⚠️ [{component}] {msg}");
}

/// Appends a backtrace when `RUST_BACKTRACE=1`.
pub fn error<T: Display>(component: &str, msg: T) {
    if matches!(std::env::var("RUST_BACKTRACE").as_deref(), Ok("1")) {
        error!("🚨 [{component}] {msg}\n{:?}", Backtrace::new());
    } else {
        error!("🚨 [{component}] {msg}");
    }
}
