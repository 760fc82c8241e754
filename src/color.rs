//! Colors used by markup directives.
//!
//! Directives name colors rather than carrying RGB values, because several of
//! them depend on whether the host is in light or dark mode. A [`Palette`]
//! resolves a [`MarkupColor`] to a concrete [`Rgb`].

/// RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from an HTML-style `0xRRGGBB` value.
    ///
    /// Bits above the low 24 are ignored.
    pub const fn from_html(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// The `0xRRGGBB` value of this color.
    pub const fn to_html(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// Parse a hex string such as `#FF8800`, `0xff8800` or `ff8800`.
///
/// Returns `None` for empty or non-hex input, or values that overflow `u64`.
pub fn parse_hex(s: &str) -> Option<u64> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}

/// Light or dark host appearance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Appearance {
    #[default]
    Light,
    Dark,
}

/// A color selected by a markup directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkupColor {
    /// `#D`: primary text, black on light and white on dark.
    Label,
    /// `#!`: alert, black on light and yellow on dark.
    Alert,
    /// `#U`: system blue adjusted for appearance.
    SystemBlue,
    /// `#K`: secondary gray adjusted for appearance.
    SystemGray,
    /// `#E`: the host's accent color.
    Accent,
    Black,
    Orange,
    Green,
    Gray,
    Red,
    Blue,
    Cyan,
    Yellow,
    Brown,
    Magenta,
    White,
}

impl MarkupColor {
    /// Map a directive selector character to its color.
    pub const fn from_directive(ch: char) -> Option<Self> {
        Some(match ch {
            'D' => Self::Label,
            '!' => Self::Alert,
            'U' => Self::SystemBlue,
            'K' => Self::SystemGray,
            'E' => Self::Accent,
            '0' => Self::Black,
            'O' => Self::Orange,
            'G' => Self::Green,
            'A' => Self::Gray,
            'R' => Self::Red,
            'B' => Self::Blue,
            'C' => Self::Cyan,
            'Y' => Self::Yellow,
            'N' => Self::Brown,
            'M' => Self::Magenta,
            'W' => Self::White,
            _ => return None,
        })
    }
}

/// Resolves markup colors for one appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub appearance: Appearance,
    pub accent: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(Appearance::Light)
    }
}

impl Palette {
    pub const fn new(appearance: Appearance) -> Self {
        Self {
            appearance,
            accent: Rgb::from_html(0x00_7AFF),
        }
    }

    #[must_use]
    pub const fn with_accent(mut self, accent: Rgb) -> Self {
        self.accent = accent;
        self
    }

    pub const fn is_dark(&self) -> bool {
        matches!(self.appearance, Appearance::Dark)
    }

    /// Resolve a directive color to RGB.
    pub const fn resolve(&self, color: MarkupColor) -> Rgb {
        let dark = self.is_dark();
        match color {
            MarkupColor::Label => {
                if dark {
                    Rgb::from_html(0xFF_FFFF)
                } else {
                    Rgb::from_html(0x00_0000)
                }
            }
            MarkupColor::Alert => {
                if dark {
                    Rgb::from_html(0xFF_CC00)
                } else {
                    Rgb::from_html(0x00_0000)
                }
            }
            MarkupColor::SystemBlue => {
                if dark {
                    Rgb::from_html(0x0A_84FF)
                } else {
                    Rgb::from_html(0x00_7AFF)
                }
            }
            MarkupColor::SystemGray => {
                if dark {
                    Rgb::from_html(0x98_989D)
                } else {
                    Rgb::from_html(0x8E_8E93)
                }
            }
            MarkupColor::Accent => self.accent,
            MarkupColor::Black => Rgb::from_html(0x00_0000),
            MarkupColor::Orange => Rgb::from_html(0xFF_8000),
            MarkupColor::Green => Rgb::from_html(0x00_FF00),
            MarkupColor::Gray => Rgb::from_html(0x80_8080),
            MarkupColor::Red => Rgb::from_html(0xFF_0000),
            MarkupColor::Blue => Rgb::from_html(0x00_00FF),
            MarkupColor::Cyan => Rgb::from_html(0x00_FFFF),
            MarkupColor::Yellow => Rgb::from_html(0xFF_FF00),
            MarkupColor::Brown => Rgb::from_html(0x99_6633),
            MarkupColor::Magenta => Rgb::from_html(0xFF_00FF),
            MarkupColor::White => Rgb::from_html(0xFF_FFFF),
        }
    }
}
