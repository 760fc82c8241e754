//! Write styled text to a terminal stream with ANSI escapes.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use ratatui::style::{Color as RatatuiColor, Modifier};

use crate::color::Palette;
use crate::markup::StyledText;

use super::layout::layout;
use super::style::{Theme, style_for_run};

/// Output settings for [`write_ansi`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnsiOptions {
    /// Emit color and attribute escapes.
    pub color: bool,
    /// Terminal width used to center lines; `None` leaves them left aligned.
    pub width: Option<u16>,
    pub points_per_cell: f32,
}

impl Default for AnsiOptions {
    fn default() -> Self {
        Self {
            color: true,
            width: None,
            points_per_cell: super::DEFAULT_POINTS_PER_CELL,
        }
    }
}

/// Write every laid-out line, each followed by a newline.
pub fn write_ansi<W: Write>(
    out: &mut W,
    text: &StyledText,
    palette: &Palette,
    options: &AnsiOptions,
) -> io::Result<()> {
    let theme = Theme::for_palette(palette);
    for line in layout(text, options.points_per_cell) {
        let mut lead = line.indent;
        if line.centered
            && let Some(width) = options.width
        {
            lead += usize::from(width).saturating_sub(line.width()) / 2;
        }
        queue!(out, Print(" ".repeat(lead)))?;
        for segment in &line.segments {
            if options.color {
                let style = style_for_run(segment.run, palette, &theme);
                if let Some(fg) = style.fg.and_then(crossterm_color) {
                    queue!(out, SetForegroundColor(fg))?;
                }
                for (modifier, attribute) in [
                    (Modifier::BOLD, Attribute::Bold),
                    (Modifier::ITALIC, Attribute::Italic),
                    (Modifier::UNDERLINED, Attribute::Underlined),
                ] {
                    if style.add_modifier.contains(modifier) {
                        queue!(out, SetAttribute(attribute))?;
                    }
                }
                queue!(
                    out,
                    Print(&segment.text),
                    SetAttribute(Attribute::Reset),
                    ResetColor
                )?;
            } else {
                queue!(out, Print(&segment.text))?;
            }
        }
        queue!(out, Print("\n"))?;
    }
    out.flush()
}

fn crossterm_color(color: RatatuiColor) -> Option<Color> {
    match color {
        RatatuiColor::Rgb(r, g, b) => Some(Color::Rgb { r, g, b }),
        RatatuiColor::Indexed(index) => Some(Color::AnsiValue(index)),
        RatatuiColor::LightBlue => Some(Color::Blue),
        RatatuiColor::Magenta => Some(Color::DarkMagenta),
        _ => None,
    }
}
