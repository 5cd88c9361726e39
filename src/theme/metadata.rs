//! theme metadata stuff
use crate::theme::{Theme, ThemeVariant, palette::Palette};

/// the metadata of a theme
#[derive(Debug, Clone)]
pub struct ThemeMetadata {
    /// the catalog key of the theme
    pub key: &'static str,
    /// the theme variant (dark/light)
    pub variant: ThemeVariant,
    /// the palette itself
    pub palette: Palette,
}

impl ThemeMetadata {
    /// make new metadata
    pub fn new<T: Theme>(key: &'static str) -> Self {
        Self {
            key,
            variant: T::variant(),
            palette: T::palette(),
        }
    }

    /// the display name of the theme
    pub fn name(&self) -> &str {
        &self.palette.name
    }
}
