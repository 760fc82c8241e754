//! Terminal output for styled text.
//!
//! - [`layout`]: Break runs into lines, expanding tabs and indents
//! - [`style`]: Map run styles to terminal colors and modifiers
//! - [`ansi`]: Write laid-out lines as ANSI escapes
//!
//! [`to_text`] builds a ratatui [`Text`] for use inside a widget.

pub mod ansi;
pub mod layout;
pub mod style;

use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};

use crate::color::Palette;
use crate::markup::StyledText;

pub use ansi::{AnsiOptions, write_ansi};
pub use layout::{LaidLine, Segment, layout};
pub use style::{Theme, style_for_run};

/// Points covered by one terminal cell at the default point size.
pub const DEFAULT_POINTS_PER_CELL: f32 = 8.5;

/// Convert styled text to ratatui lines.
pub fn to_text(text: &StyledText, palette: &Palette, points_per_cell: f32) -> Text<'static> {
    let theme = Theme::for_palette(palette);
    let lines = layout(text, points_per_cell)
        .into_iter()
        .map(|laid| {
            let mut spans = Vec::with_capacity(laid.segments.len() + 1);
            if laid.indent > 0 {
                spans.push(Span::styled(" ".repeat(laid.indent), Style::default()));
            }
            spans.extend(laid.segments.iter().map(|segment| {
                Span::styled(
                    segment.text.clone(),
                    style_for_run(segment.run, palette, &theme),
                )
            }));
            let line = Line::from(spans);
            if laid.centered { line.centered() } else { line }
        })
        .collect::<Vec<_>>();
    Text::from(lines)
}

#[cfg(test)]
mod tests;
