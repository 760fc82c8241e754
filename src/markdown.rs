//! Rewrite a small Markdown subset into `#` markup.
//!
//! Supported:
//! - `#` as the first character of a line makes a heading (bold, 2 points bigger)
//! - `**text**` is bold
//! - lines starting with `- ` or `+ ` are bullets
//! - lines are joined into a paragraph until a blank line
//! - `<pre>` at the start of a line switches to the fixed-width font with no
//!   further formatting until the next `</pre>`, which may share a line with
//!   the code
//!
//! Every `#` in the source is escaped first, so the output can be fed to
//! [`crate::markup::render`] without the user's text being read as markup.

use crate::markup::{self, MarkupOptions, StyledText, safe_escape};

const HEADING_OPEN: &str = "#b#)";
const HEADING_CLOSE: &str = "#(#b";
const BULLET_OPEN: &str = "#>\u{2022}#t";
const BULLET_CLOSE: &str = "#<";
const BOLD: &str = "#b";
const BLOCK_SEPARATOR: &str = "#n";
const PRE_OPEN: &str = "<pre>";
const PRE_CLOSE: &str = "</pre>";

/// Convert Markdown to markup.
///
/// ```
/// use hashmark::markdown::markdown_to_markup;
///
/// assert_eq!(markdown_to_markup("# Title\n\nBody"), "#b#)Title#(#b#n#nBody");
/// ```
pub fn markdown_to_markup(input: &str) -> String {
    let mut rewriter = Rewriter::default();
    for line in input.lines() {
        rewriter.line(line);
    }
    let out = rewriter.finish();
    tracing::debug!(
        input_len = input.len(),
        output_len = out.len(),
        "markdown rewritten"
    );
    out
}

/// Rewrite Markdown and render the result.
pub fn render_markdown(input: &str, options: &MarkupOptions) -> StyledText {
    markup::render(&markdown_to_markup(input), options)
}

#[derive(Debug)]
struct Paragraph {
    text: String,
    bullet: bool,
}

#[derive(Debug, Default)]
struct Rewriter {
    blocks: Vec<String>,
    paragraph: Option<Paragraph>,
    pre: Option<Vec<String>>,
}

impl Rewriter {
    fn line(&mut self, line: &str) {
        if self.pre.is_some() {
            self.pre_line(line);
            return;
        }

        if let Some(rest) = line.trim_start().strip_prefix(PRE_OPEN) {
            self.end_paragraph();
            self.pre = Some(Vec::new());
            if !rest.trim().is_empty() {
                self.pre_line(rest);
            }
            return;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            self.end_paragraph();
            self.blank();
        } else if line.starts_with('#') {
            self.heading(line);
        } else if let Some(rest) = bullet_text(trimmed) {
            self.end_paragraph();
            self.paragraph = Some(Paragraph {
                text: format!("{BULLET_OPEN}{}", inline(rest)),
                bullet: true,
            });
        } else {
            let text = inline(trimmed);
            match &mut self.paragraph {
                Some(paragraph) => {
                    paragraph.text.push(' ');
                    paragraph.text.push_str(&text);
                }
                None => {
                    self.paragraph = Some(Paragraph {
                        text,
                        bullet: false,
                    });
                }
            }
        }
    }

    fn pre_line(&mut self, line: &str) {
        let (code, rest) = match line.find(PRE_CLOSE) {
            Some(at) => (&line[..at], Some(&line[at + PRE_CLOSE.len()..])),
            None => (line, None),
        };
        if let Some(lines) = &mut self.pre
            && (rest.is_none() || !code.trim().is_empty())
        {
            lines.push(safe_escape(code));
        }
        if let Some(rest) = rest {
            self.close_pre();
            if !rest.trim().is_empty() {
                self.line(rest.trim_start());
            }
        }
    }

    fn heading(&mut self, line: &str) {
        self.end_paragraph();
        let text = line.trim_start_matches('#').trim();
        if text.is_empty() {
            return;
        }
        self.blocks
            .push(format!("{HEADING_OPEN}{}{HEADING_CLOSE}", inline(text)));
    }

    fn blank(&mut self) {
        if self.blocks.last().is_some_and(|block| !block.is_empty()) {
            self.blocks.push(String::new());
        }
    }

    fn end_paragraph(&mut self) {
        if let Some(mut paragraph) = self.paragraph.take() {
            if paragraph.bullet {
                paragraph.text.push_str(BULLET_CLOSE);
            }
            self.blocks.push(paragraph.text);
        }
    }

    fn close_pre(&mut self) {
        if let Some(lines) = self.pre.take() {
            self.blocks
                .push(format!("#X{}#P", lines.join(BLOCK_SEPARATOR)));
        }
    }

    fn finish(mut self) -> String {
        self.end_paragraph();
        self.close_pre();
        while self.blocks.last().is_some_and(String::is_empty) {
            self.blocks.pop();
        }
        self.blocks.join(BLOCK_SEPARATOR)
    }
}

fn bullet_text(trimmed: &str) -> Option<&str> {
    trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("+ "))
        .map(str::trim_start)
}

/// Escape user text and turn `**` pairs into bold toggles. An unpaired
/// trailing `**` stays literal.
fn inline(text: &str) -> String {
    let escaped = safe_escape(text);
    let pieces: Vec<&str> = escaped.split("**").collect();
    let markers = pieces.len() - 1;
    let paired = markers - markers % 2;
    let mut out = String::with_capacity(escaped.len());
    for (index, piece) in pieces.iter().enumerate() {
        if index > 0 {
            out.push_str(if index <= paired { BOLD } else { "**" });
        }
        out.push_str(piece);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{Font, remove_markup};

    fn options() -> MarkupOptions {
        MarkupOptions::new(Font::system(12.0))
    }

    #[test]
    fn test_heading_then_paragraph() {
        assert_eq!(
            markdown_to_markup("# Title\n\nBody"),
            "#b#)Title#(#b#n#nBody"
        );
    }

    #[test]
    fn test_heading_renders_bold_and_larger() {
        let text = render_markdown("# Title\n\nBody", &options());
        let runs = text.runs();
        assert_eq!(runs[0].text(), "Title");
        assert!(runs[0].is_bold());
        assert!((runs[0].point_size() - 14.0).abs() < f32::EPSILON);
        let body = runs.last().unwrap();
        assert_eq!(body.text(), "Body");
        assert!(!body.is_bold());
        assert!((body.point_size() - 12.0).abs() < f32::EPSILON);
        assert_eq!(text.plain_text(), "Title\n\nBody");
    }

    #[test]
    fn test_heading_strips_all_levels() {
        assert_eq!(markdown_to_markup("### Deep"), "#b#)Deep#(#b");
    }

    #[test]
    fn test_hash_inside_text_is_escaped() {
        assert_eq!(markdown_to_markup("Issue #42"), "Issue ##42");
        assert_eq!(remove_markup(&markdown_to_markup("Issue #42")), "Issue #42");
    }

    #[test]
    fn test_indented_hash_is_not_heading() {
        assert_eq!(markdown_to_markup("  # not"), "## not");
    }

    #[test]
    fn test_heading_text_escapes_hash() {
        assert_eq!(markdown_to_markup("# C# tips"), "#b#)C## tips#(#b");
    }

    #[test]
    fn test_single_breaks_join_paragraph() {
        assert_eq!(markdown_to_markup("one\ntwo\nthree"), "one two three");
    }

    #[test]
    fn test_multiple_blank_lines_collapse() {
        assert_eq!(markdown_to_markup("a\n\n\n\nb"), "a#n#nb");
    }

    #[test]
    fn test_leading_and_trailing_blanks_dropped() {
        assert_eq!(markdown_to_markup("\n\nword\n\n"), "word");
    }

    #[test]
    fn test_bold_pairs() {
        assert_eq!(markdown_to_markup("a **b** c"), "a #bb#b c");
    }

    #[test]
    fn test_unpaired_bold_marker_is_literal() {
        assert_eq!(markdown_to_markup("a **b** **c"), "a #bb#b **c");
        assert_eq!(remove_markup(&markdown_to_markup("2**3")), "2**3");
    }

    #[test]
    fn test_bullets() {
        assert_eq!(
            markdown_to_markup("- one\n+ two\n  continued"),
            "#>\u{2022}#tone#<#n#>\u{2022}#ttwo continued#<"
        );
    }

    #[test]
    fn test_dash_without_space_is_text() {
        assert_eq!(markdown_to_markup("-5 degrees"), "-5 degrees");
    }

    #[test]
    fn test_bullet_renders_indented() {
        let text = render_markdown("- item", &options());
        let bullet = &text.runs()[0];
        assert_eq!(bullet.text(), "\u{2022}\titem");
        assert!((bullet.style().paragraph.indent - 12.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_pre_block_is_fixed_and_literal() {
        let md = "before\n<pre>\nlet x = **y**; # note\n  indented\n</pre>\nafter";
        assert_eq!(
            markdown_to_markup(md),
            "before#n#Xlet x = **y**; ## note#n  indented#P#nafter"
        );
        let text = render_markdown(md, &options());
        let code = text
            .runs()
            .iter()
            .find(|run| run.text().contains("let x"))
            .unwrap();
        assert_eq!(code.style().font.family, "monospace");
        assert!(!code.is_bold());
    }

    #[test]
    fn test_pre_skips_heading_detection() {
        assert_eq!(markdown_to_markup("<pre>\n# raw\n</pre>"), "#X## raw#P");
    }

    #[test]
    fn test_pre_text_on_open_line() {
        assert_eq!(markdown_to_markup("<pre>code\n</pre>"), "#Xcode#P");
    }

    #[test]
    fn test_unclosed_pre_closes_at_end() {
        assert_eq!(markdown_to_markup("<pre>\na\nb"), "#Xa#nb#P");
    }

    #[test]
    fn test_text_after_pre_close() {
        assert_eq!(markdown_to_markup("<pre>\na\n</pre> tail"), "#Xa#P#ntail");
    }

    #[test]
    fn test_pre_closes_on_same_line() {
        assert_eq!(markdown_to_markup("<pre>x</pre>y\nz"), "#Xx#P#ny z");
        let text = render_markdown("<pre>x</pre>y", &options());
        let tail = text.runs().last().unwrap();
        assert_eq!(tail.text(), "y");
        assert_ne!(tail.style().font.family, "monospace");
    }

    #[test]
    fn test_pre_close_after_code_on_same_line() {
        assert_eq!(markdown_to_markup("<pre>\na\nb</pre>\nc"), "#Xa#nb#P#nc");
    }

    #[test]
    fn test_code_fence_is_plain_text() {
        assert_eq!(markdown_to_markup("```\nx\n```"), "``` x ```");
    }

    #[test]
    fn test_crlf_lines() {
        assert_eq!(markdown_to_markup("a\r\nb\r\n\r\nc"), "a b#n#nc");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(markdown_to_markup(""), "");
    }
}
