//! the built-in palettes
use crate::theme::{Theme, ThemeVariant, palette::Palette};

macro_rules! impl_theme {
    ($name:ident, $display_name:expr, $variant:expr, {
        $($field:ident: $value:literal),* $(,)?
    }) => {
        #[doc = $display_name]
        #[derive(Clone, Default)]
        pub struct $name;

        impl Theme for $name {
            fn palette() -> Palette {
                Palette {
                    name: $display_name.to_string(),
                    $($field: $value.to_string(),)*
                }
            }

            fn variant() -> ThemeVariant {
                $variant
            }
        }
    };
}

impl_theme!(DefaultBlue, "默认蓝色", ThemeVariant::Light, {
    primary: "#2196F3",
    primary_hover: "#0b7dda",
    secondary: "#4CAF50",
    secondary_hover: "#3e8e41",
    background: "#f0f2f5",
    card_background: "#ffffff",
    text_primary: "#333333",
    text_secondary: "#666666",
    border: "#e9ecef",
});

impl_theme!(FreshGreen, "清新绿色", ThemeVariant::Light, {
    primary: "#4CAF50",
    primary_hover: "#3e8e41",
    secondary: "#2196F3",
    secondary_hover: "#0b7dda",
    background: "#f1f8e9",
    card_background: "#ffffff",
    text_primary: "#2e7d32",
    text_secondary: "#558b2f",
    border: "#c8e6c9",
});

impl_theme!(ElegantPurple, "优雅紫色", ThemeVariant::Light, {
    primary: "#9c27b0",
    primary_hover: "#7b1fa2",
    secondary: "#673ab7",
    secondary_hover: "#512da8",
    background: "#f3e5f5",
    card_background: "#ffffff",
    text_primary: "#4a148c",
    text_secondary: "#6a1b9a",
    border: "#e1bee7",
});

impl_theme!(VibrantOrange, "活力橙色", ThemeVariant::Light, {
    primary: "#ff9800",
    primary_hover: "#f57c00",
    secondary: "#ff5722",
    secondary_hover: "#e64a19",
    background: "#fff3e0",
    card_background: "#ffffff",
    text_primary: "#e65100",
    text_secondary: "#ff6f00",
    border: "#ffcc80",
});

impl_theme!(DarkMode, "深色模式", ThemeVariant::Dark, {
    primary: "#bb86fc",
    primary_hover: "#985eff",
    secondary: "#03dac6",
    secondary_hover: "#018786",
    background: "#121212",
    card_background: "#1e1e1e",
    text_primary: "#ffffff",
    text_secondary: "#b3b3b3",
    border: "#333333",
});
