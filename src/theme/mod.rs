//! themeing stuff for chat frontends
//!
//! a fixed catalog of palettes, the active selection, and the projection of
//! that selection onto `--theme-*` style variables
pub mod manager;
pub mod metadata;
pub mod palette;
pub mod presets;
pub mod registry;
pub mod store;
pub mod style;

pub use {
    manager::{THEME_STORAGE_KEY, ThemeManager},
    palette::Palette,
    registry::{DEFAULT_THEME, ThemeEntry, ThemeRegistry},
    store::{MemoryStore, PreferenceStore, RedbStore},
    style::{CssVariables, StyleTarget},
};

/// a theme
pub trait Theme {
    /// the colors of the theme
    fn palette() -> Palette;
    /// the variant of the theme (light/dark)
    fn variant() -> ThemeVariant;
    /// convert the theme to CSS
    fn to_css_vars() -> String {
        Self::palette().to_css_vars()
    }
}

/// a theme variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    /// light variant
    Light,
    /// dark variant
    Dark,
}

impl std::fmt::Display for ThemeVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeVariant::Light => f.write_str("light"),
            ThemeVariant::Dark => f.write_str("dark"),
        }
    }
}
