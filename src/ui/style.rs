//! Terminal styles for markup runs.
//!
//! Runs carry named colors; the [`Palette`] picks RGB for the current
//! appearance, and terminals without truecolor get the nearest xterm-256
//! index.

use ratatui::style::{Color, Modifier, Style};

use crate::color::{Palette, Rgb};
use crate::markup::Run;

/// Styles for things the markup has no color for.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Link text without an explicit color
    pub link: Style,
    /// Image placeholder
    pub image: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a theme optimized for dark terminals.
    pub fn dark() -> Self {
        Self {
            link: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),
            image: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::ITALIC),
        }
    }

    /// Create a theme optimized for light terminals.
    pub fn light() -> Self {
        Self {
            link: Style::default()
                .fg(Color::Indexed(25))
                .add_modifier(Modifier::UNDERLINED),
            image: Style::default()
                .fg(Color::Indexed(133))
                .add_modifier(Modifier::ITALIC),
        }
    }

    pub fn for_palette(palette: &Palette) -> Self {
        if palette.is_dark() {
            Self::dark()
        } else {
            Self::light()
        }
    }
}

/// Get the style for one run.
pub fn style_for_run(run: &Run, palette: &Palette, theme: &Theme) -> Style {
    let mut style = if run.image().is_some() {
        theme.image
    } else if run.link().is_some() {
        theme.link
    } else {
        Style::default()
    };

    let run_style = run.style();
    if let Some(color) = run_style.color {
        style = style.fg(fg_color_for_terminal(palette.resolve(color)));
    }
    if run_style.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if run_style.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    style
}

pub(crate) fn fg_color_for_terminal(fg: Rgb) -> Color {
    if supports_truecolor() {
        Color::Rgb(fg.r, fg.g, fg.b)
    } else {
        Color::Indexed(rgb_to_xterm_256(fg.r, fg.g, fg.b))
    }
}

fn supports_truecolor() -> bool {
    if let Ok(force) = std::env::var("HASHMARK_TRUECOLOR") {
        let value = force.to_ascii_lowercase();
        return matches!(value.as_str(), "1" | "true" | "yes" | "on");
    }
    supports_truecolor_from_env(
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var("TERM").ok().as_deref(),
    )
}

pub(crate) fn supports_truecolor_from_env(colorterm: Option<&str>, term: Option<&str>) -> bool {
    if let Some(ct) = colorterm {
        let lower = ct.to_ascii_lowercase();
        if lower.contains("truecolor") || lower.contains("24bit") {
            return true;
        }
    }
    if let Some(t) = term {
        let lower = t.to_ascii_lowercase();
        if lower.contains("direct") || lower.contains("truecolor") {
            return true;
        }
    }
    false
}

pub(crate) fn rgb_to_xterm_256(r: u8, g: u8, b: u8) -> u8 {
    // Result is always 0-5, fits in u8
    #[allow(clippy::cast_possible_truncation)]
    let to_cube = |v: u8| ((u16::from(v) * 5) / 255) as u8;
    let ri = to_cube(r);
    let gi = to_cube(g);
    let bi = to_cube(b);
    16 + (36 * ri) + (6 * gi) + bi
}
