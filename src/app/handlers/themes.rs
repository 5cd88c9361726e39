//! theme handling stuff
use {
    super::Handlers,
    crate::{
        getopt,
        theme::{
            CssVariables, DEFAULT_THEME, PreferenceStore, RedbStore, THEME_STORAGE_KEY,
            ThemeManager,
        },
    },
    color_eyre::eyre::{OptionExt, Result, bail},
    owo_colors::OwoColorize,
    std::path::PathBuf,
};

impl Handlers {
    /// open the persisted theme selection
    ///
    /// when nothing was saved yet, the configured default theme is selected
    fn theme_manager(&self) -> Result<ThemeManager<RedbStore, CssVariables>> {
        let path = getopt!(raw theme.store_path)
            .map(PathBuf::from)
            .or_else(RedbStore::default_path)
            .ok_or_eyre("Unable to determine where to store preferences")?;

        let store = RedbStore::open(path)?;
        let saved = store.get(THEME_STORAGE_KEY)?;
        let mut manager = ThemeManager::new(store, CssVariables::new());

        let default = getopt!(theme.default);
        if saved.is_none() && default != DEFAULT_THEME {
            manager.set_theme(&default);
        }

        Ok(manager)
    }

    /// print every theme, marking the active one
    pub fn list_themes(&self) -> Result<()> {
        let manager = self.theme_manager()?;

        for entry in manager.available_themes() {
            let variant = manager
                .registry()
                .get_metadata(entry.key)
                .map(|meta| meta.variant.to_string())
                .unwrap_or_default();

            if entry.key == manager.current_key() {
                println!(
                    "{} {:<8} {} ({})",
                    "*".green(),
                    entry.key.bold(),
                    entry.name,
                    variant.bright_black()
                );
            } else {
                println!("  {:<8} {} ({})", entry.key, entry.name, variant.bright_black());
            }
        }

        Ok(())
    }

    /// switch the active theme
    pub fn set_theme(&self, key: &str) -> Result<()> {
        let mut manager = self.theme_manager()?;

        if !manager.set_theme(key) {
            bail!(
                "unknown theme {:?}, run `chatroom themes` to see the available ones",
                key
            );
        }

        println!("Switched to {}", manager.current_theme().name.bold());
        Ok(())
    }

    /// print the active theme's style variables
    pub fn show_theme(&self) -> Result<()> {
        let manager = self.theme_manager()?;
        print!("{}", manager.style().to_css());
        Ok(())
    }
}
