//! Break styled runs into terminal lines.
//!
//! Point measurements from the paragraph style are converted to cells with a
//! fixed number of points per cell. Tabs advance to the next tab stop past the
//! cursor, or to the next multiple of [`DEFAULT_TAB_CELLS`] when there is none.

use std::ptr;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::markup::{Run, StyledText};

pub const DEFAULT_TAB_CELLS: usize = 4;

/// Text from one run on one line.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment<'a> {
    pub text: String,
    pub run: &'a Run,
}

/// One terminal line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidLine<'a> {
    /// Leading blank cells from the paragraph indent.
    pub indent: usize,
    pub centered: bool,
    pub segments: Vec<Segment<'a>>,
}

impl LaidLine<'_> {
    /// Display width in cells, including the indent.
    pub fn width(&self) -> usize {
        self.indent
            + self
                .segments
                .iter()
                .map(|segment| segment.text.width())
                .sum::<usize>()
    }
}

/// Convert points to whole cells.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn cells_for(points: f32, points_per_cell: f32) -> usize {
    if points <= 0.0 || points_per_cell <= 0.0 {
        return 0;
    }
    (points / points_per_cell).round() as usize
}

/// Text shown in place of an embedded image.
pub fn placeholder(run: &Run) -> Option<String> {
    run.image().map(|image| format!("[{}]", image.name))
}

/// Lay out `text` into lines.
pub fn layout(text: &StyledText, points_per_cell: f32) -> Vec<LaidLine<'_>> {
    let mut layouter = Layouter {
        points_per_cell,
        lines: Vec::new(),
        current: LaidLine::default(),
        started: false,
        column: 0,
    };
    for run in text.runs() {
        if let Some(label) = placeholder(run) {
            layouter.start_line(run);
            layouter.column += label.width();
            layouter.push_str(run, &label);
            continue;
        }
        for ch in run.text().chars() {
            layouter.push_char(run, ch);
        }
    }
    layouter.finish()
}

struct Layouter<'a> {
    points_per_cell: f32,
    lines: Vec<LaidLine<'a>>,
    current: LaidLine<'a>,
    started: bool,
    column: usize,
}

impl<'a> Layouter<'a> {
    fn start_line(&mut self, run: &'a Run) {
        if self.started {
            return;
        }
        let paragraph = run.style().paragraph;
        self.current.indent = cells_for(paragraph.indent, self.points_per_cell);
        self.current.centered = paragraph.centered;
        self.column = self.current.indent;
        self.started = true;
    }

    fn push_char(&mut self, run: &'a Run, ch: char) {
        if ch == '\n' {
            self.start_line(run);
            self.end_line();
            return;
        }
        self.start_line(run);
        if ch == '\t' {
            let stop = self.next_tab_stop(run);
            let spaces = " ".repeat(stop - self.column);
            self.column = stop;
            self.push_str(run, &spaces);
            return;
        }
        self.column += ch.width().unwrap_or(0);
        self.push_str(run, ch.encode_utf8(&mut [0; 4]));
    }

    fn next_tab_stop(&self, run: &Run) -> usize {
        run.style()
            .paragraph
            .tab_stops()
            .into_iter()
            .map(|points| cells_for(points, self.points_per_cell))
            .find(|&stop| stop > self.column)
            .unwrap_or_else(|| (self.column / DEFAULT_TAB_CELLS + 1) * DEFAULT_TAB_CELLS)
    }

    fn push_str(&mut self, run: &'a Run, s: &str) {
        match self.current.segments.last_mut() {
            Some(segment) if ptr::eq(segment.run, run) => segment.text.push_str(s),
            _ => self.current.segments.push(Segment {
                text: s.to_string(),
                run,
            }),
        }
    }

    fn end_line(&mut self) {
        self.lines.push(std::mem::take(&mut self.current));
        self.started = false;
        self.column = 0;
    }

    fn finish(mut self) -> Vec<LaidLine<'a>> {
        if !self.current.segments.is_empty() {
            self.end_line();
        }
        self.lines
    }
}
