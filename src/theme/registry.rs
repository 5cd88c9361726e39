//! theme registry stuff
use crate::theme::{Theme, ThemeVariant, metadata::ThemeMetadata, palette::Palette, presets::*};

/// the key selected when nothing (valid) was persisted
pub const DEFAULT_THEME: &str = "default";

/// a `{key, name}` pair describing one catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeEntry {
    /// the catalog key
    pub key: &'static str,
    /// the display name
    pub name: String,
}

/// the theme registry
///
/// themes keep the order they were registered in
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    /// the installed themes
    themes: Vec<ThemeMetadata>,
}

impl ThemeRegistry {
    /// make a new registry with the built-in catalog
    pub fn new() -> Self {
        let mut registry = Self::empty();

        registry.register::<DefaultBlue>(DEFAULT_THEME);
        registry.register::<FreshGreen>("green");
        registry.register::<ElegantPurple>("purple");
        registry.register::<VibrantOrange>("orange");
        registry.register::<DarkMode>("dark");

        registry
    }

    /// make a registry with no themes in it
    fn empty() -> Self {
        Self { themes: Vec::new() }
    }

    /// register a theme, replacing any theme already using `key`
    fn register<T: Theme>(&mut self, key: &'static str) {
        let meta = ThemeMetadata::new::<T>(key);

        match self.themes.iter_mut().find(|m| m.key == key) {
            Some(existing) => *existing = meta,
            None => self.themes.push(meta),
        }
    }

    /// whether `key` is in the catalog
    pub fn contains(&self, key: &str) -> bool {
        self.get_metadata(key).is_some()
    }

    /// get a palette by its key
    pub fn get_theme(&self, key: &str) -> Option<&Palette> {
        self.get_metadata(key).map(|meta| &meta.palette)
    }

    /// get the metadata of a theme
    pub fn get_metadata(&self, key: &str) -> Option<&ThemeMetadata> {
        self.themes.iter().find(|meta| meta.key == key)
    }

    /// get the catalog's own `&'static` copy of a key
    pub fn canonical_key(&self, key: &str) -> Option<&'static str> {
        self.get_metadata(key).map(|meta| meta.key)
    }

    /// list available themes in declaration order
    pub fn list_themes(&self) -> Vec<ThemeEntry> {
        self.themes
            .iter()
            .map(|meta| ThemeEntry {
                key: meta.key,
                name: meta.name().to_string(),
            })
            .collect()
    }

    /// list theme keys by variant
    pub fn list_by_variant(&self, variant: ThemeVariant) -> Vec<&'static str> {
        self.themes
            .iter()
            .filter(|meta| meta.variant == variant)
            .map(|meta| meta.key)
            .collect()
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
