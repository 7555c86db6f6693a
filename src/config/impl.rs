use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks. Falls back to defaults when nothing has been
/// loaded yet.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .load_full()
}

/// Initialize the global configuration
///
/// `None` reads "config.toml" in the current directory. A later call replaces
/// the stored configuration.
///
/// # Examples
/// ```no_run
/// use linktally::config::init_config_from;
/// init_config_from(Some("custom.toml"));
/// ```
pub fn init_config_from(path: Option<&str>) {
    let loaded = StaticConfig::load(path);
    match CONFIG.get() {
        Some(current) => current.store(Arc::new(loaded)),
        None => {
            CONFIG.get_or_init(|| ArcSwap::from_pointee(loaded));
        }
    }
}
