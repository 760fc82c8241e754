//! Single-pass scanner from markup text to styled runs.

use super::MarkupOptions;
use super::directive::{Directive, ESCAPE, SECOND_TAB_STEP, is_name_char};
use super::resolver::SymbolRequest;
use super::types::{
    Font, ImageKind, MIN_POINT_SIZE, ParagraphStyle, Run, RunStyle, StyledText, Unresolved,
};
use crate::color::MarkupColor;

/// Mutable style state, advanced as directives are read.
#[derive(Debug, Clone)]
struct StyleState {
    base: Font,
    fixed_family: String,
    family: String,
    saved_families: Vec<String>,
    size_delta: f32,
    bold: bool,
    italic: bool,
    color: Option<MarkupColor>,
    paragraph: ParagraphStyle,
    link: Option<String>,
}

impl StyleState {
    fn new(options: &MarkupOptions) -> Self {
        let fixed_family = options.fixed_font.as_ref().map_or_else(
            || Font::monospaced(options.font.size).family,
            |font| font.family.clone(),
        );
        Self {
            base: options.font.clone(),
            fixed_family,
            family: options.font.family.clone(),
            saved_families: Vec::new(),
            size_delta: 0.0,
            bold: false,
            italic: false,
            color: None,
            paragraph: ParagraphStyle::default(),
            link: None,
        }
    }

    fn point_size(&self) -> f32 {
        (self.base.size + self.size_delta).max(MIN_POINT_SIZE)
    }

    fn resolved(&self) -> RunStyle {
        RunStyle {
            font: Font::new(self.family.clone(), self.point_size()),
            bold: self.bold,
            italic: self.italic,
            color: self.color,
            paragraph: self.paragraph,
        }
    }

    fn push_fixed_font(&mut self) {
        let previous = std::mem::replace(&mut self.family, self.fixed_family.clone());
        self.saved_families.push(previous);
    }

    fn pop_font(&mut self) {
        match self.saved_families.pop() {
            Some(family) => self.family = family,
            None => tracing::debug!("font pop with nothing saved"),
        }
    }

    fn indent(&mut self, steps: i8) {
        let delta = f32::from(steps) * self.base.size;
        self.paragraph.indent = (self.paragraph.indent + delta).max(0.0);
        self.paragraph.first_tab = (self.paragraph.first_tab + delta).max(0.0);
    }

    fn move_second_tab(&mut self, steps: i8) {
        let delta = f32::from(steps) * SECOND_TAB_STEP * self.base.size;
        self.paragraph.second_tab = (self.paragraph.second_tab + delta).max(0.0);
    }
}

pub(super) struct Scanner<'a> {
    chars: Vec<char>,
    pos: usize,
    options: &'a MarkupOptions,
    state: StyleState,
    runs: Vec<Run>,
    unresolved: Vec<Unresolved>,
}

impl<'a> Scanner<'a> {
    pub(super) fn new(input: &str, options: &'a MarkupOptions) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            options,
            state: StyleState::new(options),
            runs: Vec::new(),
            unresolved: Vec::new(),
        }
    }

    pub(super) fn run(mut self) -> StyledText {
        while let Some(ch) = self.bump() {
            if ch == ESCAPE {
                self.escape();
            } else {
                self.push_char(ch);
            }
        }
        tracing::debug!(
            chars = self.chars.len(),
            runs = self.runs.len(),
            unresolved = self.unresolved.len(),
            "markup scanned"
        );
        StyledText::from_parts(self.runs, self.unresolved)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        Some(ch)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn push_char(&mut self, ch: char) {
        let style = self.state.resolved();
        let link = self.state.link.as_deref();
        match self.runs.last_mut() {
            Some(run) if run.accepts(&style, link) => run.push(ch),
            _ => {
                let mut run = Run::new(String::new(), style, link.map(ToOwned::to_owned));
                run.push(ch);
                self.runs.push(run);
            }
        }
    }

    fn push_literal(&mut self, selector: char) {
        self.push_char(ESCAPE);
        self.push_char(selector);
    }

    /// Handle the characters after an escape; `self.pos` is on the selector.
    fn escape(&mut self) {
        let start = self.pos - 1;
        let Some(selector) = self.peek() else {
            self.push_char(ESCAPE);
            return;
        };
        let Some(directive) = Directive::from_selector(selector) else {
            // The selector goes out as ordinary text on the next step.
            tracing::debug!(selector = %selector, offset = start, "unknown directive kept literal");
            self.push_char(ESCAPE);
            return;
        };
        self.pos += 1;

        match directive {
            Directive::ToggleBold => self.state.bold = !self.state.bold,
            Directive::ToggleItalic => self.state.italic = !self.state.italic,
            Directive::LiteralEscape => self.push_char(ESCAPE),
            Directive::Newline => self.push_char('\n'),
            Directive::Tab => self.push_char('\t'),
            Directive::AdjustSize(delta) => self.state.size_delta += delta,
            Directive::PushFixedFont => self.state.push_fixed_font(),
            Directive::PopFont => self.state.pop_font(),
            Directive::SetColor(color) => self.state.color = Some(color),
            Directive::Indent(steps) => self.state.indent(steps),
            Directive::SecondTab(steps) => self.state.move_second_tab(steps),
            Directive::ToggleIndentToSecondTab => {
                self.state.paragraph.indent_to_second_tab =
                    !self.state.paragraph.indent_to_second_tab;
            }
            Directive::ToggleCenter => {
                self.state.paragraph.centered = !self.state.paragraph.centered;
            }
            Directive::OpenLink => match self.scan_link() {
                Some((url, resume)) => {
                    self.state.link = Some(url);
                    self.pos = resume;
                }
                None => {
                    tracing::debug!(offset = start, "unterminated link kept literal");
                    self.push_literal(selector);
                }
            },
            Directive::CloseLink => self.state.link = None,
            Directive::InsertImage(kind) => {
                let name = self.scan_name();
                if name.is_empty() {
                    self.push_literal(selector);
                } else {
                    self.insert_image(name, kind, start);
                }
            }
        }
    }

    /// Read the URL after `#L`. Returns the URL and the position just past its
    /// terminating space, or `None` when the link is truncated: no space, an
    /// empty URL, or no `#T` anywhere after the URL.
    fn scan_link(&self) -> Option<(String, usize)> {
        let space = self.chars[self.pos..]
            .iter()
            .position(|&c| c == ' ')
            .map(|offset| self.pos + offset)?;
        if space == self.pos || !self.link_closes_after(space + 1) {
            return None;
        }
        let url = self.chars[self.pos..space].iter().collect();
        Some((url, space + 1))
    }

    fn link_closes_after(&self, from: usize) -> bool {
        let mut i = from;
        while i < self.chars.len() {
            if self.chars[i] != ESCAPE {
                i += 1;
                continue;
            }
            match self.chars.get(i + 1) {
                Some('T') => return true,
                // A nested link's URL may itself contain `#`.
                Some('L') => {
                    match self.chars[i + 2..].iter().position(|&c| c == ' ') {
                        Some(offset) => i += 2 + offset + 1,
                        None => return false,
                    }
                }
                Some(_) => i += 2,
                None => return false,
            }
        }
        false
    }

    /// Read a symbol or image name. A trailing `.` is left as text so names
    /// can end a sentence.
    fn scan_name(&mut self) -> String {
        let start = self.pos;
        let mut end = start;
        while self.chars.get(end).copied().is_some_and(is_name_char) {
            end += 1;
        }
        while end > start && self.chars[end - 1] == '.' {
            end -= 1;
        }
        self.pos = end;
        self.chars[start..end].iter().collect()
    }

    fn insert_image(&mut self, name: String, kind: ImageKind, offset: usize) {
        let style = self.state.resolved();
        let request = SymbolRequest {
            name: &name,
            kind,
            point_size: style.font.size,
            bold: style.bold,
            color: style.color,
        };
        match self.options.resolvers.resolve(&request) {
            Some(image) => self
                .runs
                .push(Run::attachment(image, style, self.state.link.clone())),
            None => self.unresolved.push(Unresolved { name, kind, offset }),
        }
    }
}
