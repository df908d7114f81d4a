//! Theme and styling configuration.

use std::sync::OnceLock;

use ratatui::style::Color;
use tracing::{debug, warn};

/// Color theme for the application.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary foreground color.
    pub fg: Color,
    /// Accent color for titles and the active field.
    pub accent: Color,
    /// Border color for unfocused fields.
    pub border: Color,
    /// Border color for the focused field.
    pub border_focused: Color,
    /// Text color inside inputs.
    pub input_fg: Color,
    /// Placeholder text color.
    pub input_placeholder: Color,
    /// Chip text color.
    pub chip_fg: Color,
    /// Chip background color.
    pub chip_bg: Color,
    /// Background for the chip holding keyboard focus.
    pub chip_focused_bg: Color,
    /// Background of the highlighted suggestion row.
    pub highlight_bg: Color,
    /// Muted text (hints, empty states).
    pub muted: Color,
}

impl Theme {
    /// The default dark theme.
    pub fn dark() -> Self {
        Self {
            fg: Color::White,
            accent: Color::Magenta,
            border: Color::DarkGray,
            border_focused: Color::Magenta,
            input_fg: Color::White,
            input_placeholder: Color::DarkGray,
            chip_fg: Color::White,
            chip_bg: Color::Blue,
            chip_focused_bg: Color::Yellow,
            highlight_bg: Color::DarkGray,
            muted: Color::DarkGray,
        }
    }

    /// A light theme for bright terminals.
    pub fn light() -> Self {
        Self {
            fg: Color::Black,
            accent: Color::Magenta,
            border: Color::Gray,
            border_focused: Color::Magenta,
            input_fg: Color::Black,
            input_placeholder: Color::Gray,
            chip_fg: Color::White,
            chip_bg: Color::Blue,
            chip_focused_bg: Color::LightRed,
            highlight_bg: Color::LightBlue,
            muted: Color::Gray,
        }
    }

    /// Look up a theme by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme named in the settings.
///
/// Unknown names fall back to the dark theme. Only the first call has an effect.
pub fn init_theme(name: &str) {
    let theme = Theme::by_name(name).unwrap_or_else(|| {
        warn!(theme = %name, "Unknown theme, using dark");
        Theme::dark()
    });
    if THEME.set(theme).is_ok() {
        debug!(theme = %name, "Theme initialized");
    }
}

/// Get the active theme.
pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name() {
        assert!(Theme::by_name("dark").is_some());
        assert!(Theme::by_name("light").is_some());
        assert!(Theme::by_name("solarized").is_none());
    }

    #[test]
    fn test_theme_always_available() {
        let t = theme();
        assert_ne!(t.chip_bg, t.chip_focused_bg);
    }
}
