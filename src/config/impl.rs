use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;
use crate::errors::Result;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config() first.")
        .load_full()
}

/// Initialize the global configuration
///
/// Loads `path` when given (the file must then exist), otherwise an optional
/// `config.toml` in the current directory. Environment overrides apply in
/// both cases. Calling it again after a successful load is a no-op.
///
/// # Examples
/// ```no_run
/// use utm_attribution::config::init_config;
/// init_config(None).expect("config");
/// ```
pub fn init_config(path: Option<&str>) -> Result<()> {
    if CONFIG.get().is_some() {
        return Ok(());
    }

    let config = match path {
        Some(path) => StaticConfig::load_from(path, true)?,
        None => StaticConfig::load()?,
    };
    let _ = CONFIG.set(ArcSwap::from_pointee(config));
    Ok(())
}
