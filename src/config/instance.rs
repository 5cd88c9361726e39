//! config singleton management stuff
use {
    crate::config::options::ChatroomCfg,
    color_eyre::Result,
    std::sync::{LazyLock, RwLock, RwLockReadGuard},
    tracing::error,
};

/// global config instance
static CONFIG: LazyLock<RwLock<ChatroomCfg>> = LazyLock::new(|| {
    RwLock::new(ChatroomCfg::load().unwrap_or_else(|e| {
        error!("failed to load configuration, using defaults: {:?}", e);
        ChatroomCfg::default()
    }))
});

/// init the config explicitly
pub fn init_config() -> Result<()> {
    let _l = config()?;
    Ok(())
}

/// get a ro ref to the config
pub fn config() -> Result<RwLockReadGuard<'static, ChatroomCfg>> {
    CONFIG
        .read()
        .map_err(|e| color_eyre::eyre::eyre!("Configuration lock poisoned: {}", e))
}

/// get a specific config value with a default fallback
pub fn get_or_default<T, F>(getter: F, default: T) -> T
where
    F: FnOnce(&ChatroomCfg) -> Option<T>,
    T: Clone,
{
    config()
        .ok()
        .and_then(|cfg| getter(&cfg))
        .unwrap_or(default)
}
