//! Styled text types produced by the markup scanner.

use crate::color::MarkupColor;

/// Family used when no fixed-width font is supplied.
pub const MONOSPACE_FAMILY: &str = "monospace";

/// Family of the default base font.
pub const SYSTEM_FAMILY: &str = "system";

/// Point size of the default base font.
pub const DEFAULT_POINT_SIZE: f32 = 17.0;

/// Smallest point size a run can resolve to.
pub const MIN_POINT_SIZE: f32 = 1.0;

/// A font handle: only the family and size matter to the scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f32,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }

    /// The host's body font at `size`.
    pub fn system(size: f32) -> Self {
        Self::new(SYSTEM_FAMILY, size)
    }

    /// A monospaced font at `size`.
    pub fn monospaced(size: f32) -> Self {
        Self::new(MONOSPACE_FAMILY, size)
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::system(DEFAULT_POINT_SIZE)
    }
}

/// Paragraph layout attributes, in points.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParagraphStyle {
    /// Head indent for wrapped lines.
    pub indent: f32,
    /// First tab stop; moves with the indent.
    pub first_tab: f32,
    /// Second tab stop.
    pub second_tab: f32,
    /// Wrapped lines indent to the second tab stop instead of `indent`.
    pub indent_to_second_tab: bool,
    /// Center the paragraph.
    pub centered: bool,
}

impl ParagraphStyle {
    /// Effective head indent for continuation lines.
    pub const fn head_indent(&self) -> f32 {
        if self.indent_to_second_tab {
            self.second_tab
        } else {
            self.indent
        }
    }

    /// Tab stops in ascending order, skipping the second stop when it does
    /// not lie past the first.
    pub fn tab_stops(&self) -> Vec<f32> {
        let mut stops = vec![self.first_tab];
        if self.second_tab > self.first_tab {
            stops.push(self.second_tab);
        }
        stops
    }
}

/// Resolved style of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStyle {
    pub font: Font,
    pub bold: bool,
    pub italic: bool,
    /// `None` means the host's default text color.
    pub color: Option<MarkupColor>,
    pub paragraph: ParagraphStyle,
}

impl RunStyle {
    pub fn plain(font: Font) -> Self {
        Self {
            font,
            bold: false,
            italic: false,
            color: None,
            paragraph: ParagraphStyle::default(),
        }
    }
}

/// Where an embedded image comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    /// A named system symbol (`#S`).
    Symbol,
    /// A named image from the host's bundle (`#F`).
    Bundled,
}

/// An image returned by a resolver, embedded in a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Name that was asked for.
    pub name: String,
    pub kind: ImageKind,
    /// Host-specific handle (path, asset id, glyph...).
    pub handle: String,
    /// Size the image should be drawn at, in points.
    pub point_size: f32,
}

/// A contiguous span of text sharing one style.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    text: String,
    style: RunStyle,
    link: Option<String>,
    attachment: Option<Image>,
}

impl Run {
    pub const fn new(text: String, style: RunStyle, link: Option<String>) -> Self {
        Self {
            text,
            style,
            link,
            attachment: None,
        }
    }

    /// A run holding an embedded image and no text.
    pub const fn attachment(image: Image, style: RunStyle, link: Option<String>) -> Self {
        Self {
            text: String::new(),
            style,
            link,
            attachment: Some(image),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> &RunStyle {
        &self.style
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub const fn image(&self) -> Option<&Image> {
        self.attachment.as_ref()
    }

    pub const fn is_bold(&self) -> bool {
        self.style.bold
    }

    pub const fn is_italic(&self) -> bool {
        self.style.italic
    }

    pub const fn point_size(&self) -> f32 {
        self.style.font.size
    }

    pub(crate) fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    pub(crate) fn ends_line(&self) -> bool {
        self.text.ends_with('\n')
    }

    pub(crate) fn accepts(&self, style: &RunStyle, link: Option<&str>) -> bool {
        self.attachment.is_none()
            && !self.ends_line()
            && self.link.as_deref() == link
            && &self.style == style
    }
}

/// A symbol or image that no resolver could supply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    pub name: String,
    pub kind: ImageKind,
    /// Character offset of the directive in the input.
    pub offset: usize,
}

/// The result of rendering markup: runs in reading order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyledText {
    runs: Vec<Run>,
    unresolved: Vec<Unresolved>,
}

impl StyledText {
    pub(crate) const fn from_parts(runs: Vec<Run>, unresolved: Vec<Unresolved>) -> Self {
        Self { runs, unresolved }
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// All run text concatenated, ignoring style and attachments.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for run in &self.runs {
            out.push_str(run.text());
        }
        out
    }

    /// `(text, url)` for each link, merging adjacent runs with the same target.
    pub fn links(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = Vec::new();
        let mut previous_linked = false;
        for run in &self.runs {
            match run.link() {
                Some(url) => {
                    let extends =
                        previous_linked && out.last().is_some_and(|(_, last)| last == url);
                    if extends {
                        if let Some((text, _)) = out.last_mut() {
                            text.push_str(run.text());
                        }
                    } else {
                        out.push((run.text().to_string(), url.to_string()));
                    }
                    previous_linked = true;
                }
                None => previous_linked = false,
            }
        }
        out
    }

    /// Symbol and image directives that were dropped because nothing resolved them.
    pub fn unresolved(&self) -> &[Unresolved] {
        &self.unresolved
    }

    /// Embedded images in reading order.
    pub fn images(&self) -> impl Iterator<Item = &Image> {
        self.runs.iter().filter_map(Run::image)
    }
}
