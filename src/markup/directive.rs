//! The directive table: what each `#x` selector means.

use crate::color::MarkupColor;

use super::types::ImageKind;

/// Escape character that starts every directive.
pub const ESCAPE: char = '#';

/// Point-size change in one `#+`/`#-` step.
pub const SIZE_STEP_SMALL: f32 = 1.0;
/// Point-size change in one `#)`/`#(` step.
pub const SIZE_STEP_MEDIUM: f32 = 2.0;
/// Point-size change in one `#]`/`#[` step.
pub const SIZE_STEP_LARGE: f32 = 4.0;
/// The second tab stop moves by this many base point sizes per `#~`/`#.`.
pub const SECOND_TAB_STEP: f32 = 5.0;

/// A decoded directive selector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Directive {
    /// `#b`
    ToggleBold,
    /// `#i`
    ToggleItalic,
    /// `#h` or `##`
    LiteralEscape,
    /// `#n`
    Newline,
    /// `#t`
    Tab,
    /// `#+ #- #( #) #[ #]`
    AdjustSize(f32),
    /// `#X`
    PushFixedFont,
    /// `#P`
    PopFont,
    /// Any color selector.
    SetColor(MarkupColor),
    /// `#>` / `#<`
    Indent(i8),
    /// `#~` / `#.`
    SecondTab(i8),
    /// `#2`
    ToggleIndentToSecondTab,
    /// `#|`
    ToggleCenter,
    /// `#L`, followed by a URL and a space.
    OpenLink,
    /// `#T`
    CloseLink,
    /// `#S` or `#F`, followed by a name.
    InsertImage(ImageKind),
}

impl Directive {
    /// Decode the character that follows the escape.
    ///
    /// Returns `None` for selectors with no meaning; the scanner renders
    /// those as literal text.
    pub fn from_selector(ch: char) -> Option<Self> {
        let directive = match ch {
            'b' => Self::ToggleBold,
            'i' => Self::ToggleItalic,
            'h' | ESCAPE => Self::LiteralEscape,
            'n' => Self::Newline,
            't' => Self::Tab,
            '+' => Self::AdjustSize(SIZE_STEP_SMALL),
            '-' => Self::AdjustSize(-SIZE_STEP_SMALL),
            ')' => Self::AdjustSize(SIZE_STEP_MEDIUM),
            '(' => Self::AdjustSize(-SIZE_STEP_MEDIUM),
            ']' => Self::AdjustSize(SIZE_STEP_LARGE),
            '[' => Self::AdjustSize(-SIZE_STEP_LARGE),
            'X' => Self::PushFixedFont,
            'P' => Self::PopFont,
            '>' => Self::Indent(1),
            '<' => Self::Indent(-1),
            '~' => Self::SecondTab(1),
            '.' => Self::SecondTab(-1),
            '2' => Self::ToggleIndentToSecondTab,
            '|' => Self::ToggleCenter,
            'L' => Self::OpenLink,
            'T' => Self::CloseLink,
            'S' => Self::InsertImage(ImageKind::Symbol),
            'F' => Self::InsertImage(ImageKind::Bundled),
            other => return MarkupColor::from_directive(other).map(Self::SetColor),
        };
        Some(directive)
    }
}

/// Characters allowed in `#S`/`#F` names.
pub const fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-')
}
