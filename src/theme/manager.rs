//! the active theme selection
use {
    crate::theme::{
        palette::Palette,
        registry::{DEFAULT_THEME, ThemeEntry, ThemeRegistry},
        store::PreferenceStore,
        style::StyleTarget,
    },
    tracing::{debug, info, warn},
};

/// the preference key the selected theme is persisted under
pub const THEME_STORAGE_KEY: &str = "chatroom-theme";

/// tracks the active theme, persists it, and keeps the style target in sync
///
/// the style target is written once on construction and again on every
/// change of the selection
pub struct ThemeManager<S: PreferenceStore, T: StyleTarget> {
    /// the catalog
    registry: ThemeRegistry,
    /// the active key, always present in `registry`
    current: &'static str,
    /// where the selection is persisted
    store: S,
    /// where the palette is projected
    target: T,
}

impl<S: PreferenceStore, T: StyleTarget> ThemeManager<S, T> {
    /// make a manager with the built-in catalog
    pub fn new(store: S, target: T) -> Self {
        let mut manager = Self {
            registry: ThemeRegistry::new(),
            current: DEFAULT_THEME,
            store,
            target,
        };

        manager.load_theme();
        manager.apply();
        manager
    }

    /// switch to `key`
    ///
    /// unknown keys are ignored and leave both the selection and the store
    /// untouched. returns whether the switch happened
    pub fn set_theme(&mut self, key: &str) -> bool {
        let Some(key) = self.registry.canonical_key(key) else {
            debug!("ignoring unknown theme {:?}", key);
            return false;
        };

        self.current = key;
        self.apply();

        if let Err(e) = self.store.set(THEME_STORAGE_KEY, key) {
            warn!(error = %e, "failed to persist theme selection");
        }

        info!("switched to theme {}", key);
        true
    }

    /// the palette of the active theme
    pub fn current_theme(&self) -> &Palette {
        self.registry
            .get_theme(self.current)
            .expect("active theme key is always in the catalog")
    }

    /// the key of the active theme
    pub fn current_key(&self) -> &'static str {
        self.current
    }

    /// every theme in the catalog as `{key, name}`, in declaration order
    pub fn available_themes(&self) -> Vec<ThemeEntry> {
        self.registry.list_themes()
    }

    /// select the persisted theme, if there is a valid one
    ///
    /// the key is already stored, so it isn't written back
    pub fn load_theme(&mut self) {
        let saved = match self.store.get(THEME_STORAGE_KEY) {
            Ok(saved) => saved,
            Err(e) => {
                warn!(error = %e, "failed to read persisted theme");
                return;
            }
        };

        let Some(key) = saved.as_deref().and_then(|k| self.registry.canonical_key(k)) else {
            debug!("no valid persisted theme ({:?}), keeping {}", saved, self.current);
            return;
        };

        if key != self.current {
            self.current = key;
            self.apply();
        }
    }

    /// the catalog
    pub fn registry(&self) -> &ThemeRegistry {
        &self.registry
    }

    /// the style target
    pub fn style(&self) -> &T {
        &self.target
    }

    /// the preference store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// project the active palette onto the style target
    fn apply(&mut self) {
        let Some(palette) = self.registry.get_theme(self.current) else {
            return;
        };

        for (name, value) in palette.css_vars() {
            self.target.set_property(&name, value);
        }
    }
}
