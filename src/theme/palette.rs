//! palette stuff

/// the prefix every projected style variable starts with
pub const VAR_PREFIX: &str = "--theme-";

/// a named set of colors
///
/// field names map 1:1 onto style variables, e.g. `primary_hover` becomes
/// `--theme-primaryHover`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// display name, never projected
    pub name: String,
    /// main accent color
    pub primary: String,
    /// main accent color while hovered
    pub primary_hover: String,
    /// secondary accent color
    pub secondary: String,
    /// secondary accent color while hovered
    pub secondary_hover: String,
    /// page background
    pub background: String,
    /// card/panel background
    pub card_background: String,
    /// main text color
    pub text_primary: String,
    /// muted text color
    pub text_secondary: String,
    /// border color
    pub border: String,
}

impl Palette {
    /// the color fields as `(field, value)` pairs, in declaration order
    pub fn fields(&self) -> [(&'static str, &str); 9] {
        [
            ("primary", &self.primary),
            ("primaryHover", &self.primary_hover),
            ("secondary", &self.secondary),
            ("secondaryHover", &self.secondary_hover),
            ("background", &self.background),
            ("cardBackground", &self.card_background),
            ("textPrimary", &self.text_primary),
            ("textSecondary", &self.text_secondary),
            ("border", &self.border),
        ]
    }

    /// the color fields as `(variable, value)` pairs, e.g. `("--theme-border", "#333333")`
    pub fn css_vars(&self) -> impl Iterator<Item = (String, &str)> {
        self.fields()
            .into_iter()
            .map(|(field, value)| (var_name(field), value))
    }

    /// convert the palette to CSS declarations
    pub fn to_css_vars(&self) -> String {
        let mut vars = String::new();

        for (name, value) in self.css_vars() {
            vars.push_str(&format!("{}: {};\n", name, value));
        }

        vars
    }
}

/// the style variable for a palette field
pub fn var_name(field: &str) -> String {
    format!("{}{}", VAR_PREFIX, field)
}

#[cfg(test)]
mod tests {
    use {super::*, crate::theme::presets::DarkMode, crate::theme::Theme};

    #[test]
    fn test_fields_skip_name() {
        let palette = DarkMode::palette();
        assert!(palette.fields().iter().all(|(field, _)| *field != "name"));
        assert_eq!(palette.fields().len(), 9);
    }

    #[test]
    fn test_css_vars_use_camel_case_fields() {
        let css = DarkMode::to_css_vars();
        assert!(css.contains("--theme-primaryHover: #985eff;\n"));
        assert!(css.contains("--theme-cardBackground: #1e1e1e;\n"));
        assert!(!css.contains("name"));
        assert_eq!(css.lines().count(), 9);
    }
}
