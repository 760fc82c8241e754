use super::*;
use crate::color::{Appearance, MarkupColor};
use crate::markup::{CatalogResolver, MarkupOptions, ResolverChain, render};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Alignment;
use ratatui::style::Modifier;
use ratatui::widgets::Paragraph;

fn options() -> MarkupOptions {
    MarkupOptions::default()
}

fn line_strings(text: &StyledText) -> Vec<String> {
    layout(text, DEFAULT_POINTS_PER_CELL)
        .iter()
        .map(|line| {
            let body: String = line.segments.iter().map(|s| s.text.as_str()).collect();
            format!("{}{body}", " ".repeat(line.indent))
        })
        .collect()
}

#[test]
fn test_layout_splits_lines_at_newlines() {
    let text = render("one#ntwo#n#nfour", &options());
    assert_eq!(line_strings(&text), vec!["one", "two", "", "four"]);
}

#[test]
fn test_layout_trailing_newline_adds_no_empty_line() {
    let text = render("one#n", &options());
    assert_eq!(line_strings(&text), vec!["one"]);
}

#[test]
fn test_layout_empty_text_has_no_lines() {
    let text = render("", &options());
    assert!(layout(&text, DEFAULT_POINTS_PER_CELL).is_empty());
}

#[test]
fn test_layout_tab_without_stops_uses_default_width() {
    let text = render("a#tb", &options());
    assert_eq!(line_strings(&text), vec!["a   b"]);
}

#[test]
fn test_layout_indent_comes_from_paragraph() {
    let text = render("#>•#tItem", &options());
    let lines = layout(&text, DEFAULT_POINTS_PER_CELL);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].indent, 2);
    assert_eq!(line_strings(&text), vec!["  • Item"]);
    assert_eq!(lines[0].width(), 8);
}

#[test]
fn test_layout_keeps_one_segment_per_run() {
    let text = render("a#bb#bc", &options());
    let lines = layout(&text, DEFAULT_POINTS_PER_CELL);
    let segments: Vec<&str> = lines[0].segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(segments, vec!["a", "b", "c"]);
    assert!(lines[0].segments[1].run.is_bold());
}

#[test]
fn test_layout_image_placeholder() {
    let resolvers = ResolverChain::new().with(CatalogResolver::new().entry("star", "s"));
    let opts = MarkupOptions::default().with_resolvers(resolvers);
    let text = render("a #Sstar b", &opts);
    assert_eq!(line_strings(&text), vec!["a [star] b"]);
}

#[test]
fn test_cells_for_rounds_and_ignores_negative() {
    assert_eq!(layout::cells_for(17.0, 8.5), 2);
    assert_eq!(layout::cells_for(12.0, 8.5), 1);
    assert_eq!(layout::cells_for(-3.0, 8.5), 0);
    assert_eq!(layout::cells_for(10.0, 0.0), 0);
}

#[test]
fn test_style_for_run_sets_modifiers() {
    let text = render("#b#iboth#i#b #Llink T#T", &options());
    let palette = Palette::new(Appearance::Dark);
    let theme = Theme::for_palette(&palette);
    let runs = text.runs();

    let bold_italic = style_for_run(&runs[0], &palette, &theme);
    assert!(bold_italic.add_modifier.contains(Modifier::BOLD));
    assert!(bold_italic.add_modifier.contains(Modifier::ITALIC));

    let link = runs.iter().find(|run| run.link().is_some()).unwrap();
    let link_style = style_for_run(link, &palette, &theme);
    assert!(link_style.add_modifier.contains(Modifier::UNDERLINED));
}

#[test]
fn test_style_for_run_uses_palette_color() {
    let text = render("#Rred", &options());
    assert_eq!(text.runs()[0].style().color, Some(MarkupColor::Red));
    let palette = Palette::default();
    let style = style_for_run(&text.runs()[0], &palette, &Theme::light());
    assert!(style.fg.is_some());
}

#[test]
fn test_truecolor_detection_from_env() {
    assert!(style::supports_truecolor_from_env(Some("truecolor"), None));
    assert!(style::supports_truecolor_from_env(Some("24bit"), None));
    assert!(style::supports_truecolor_from_env(None, Some("xterm-direct")));
    assert!(!style::supports_truecolor_from_env(None, Some("xterm-256color")));
    assert!(!style::supports_truecolor_from_env(None, None));
}

#[test]
fn test_rgb_to_xterm_256_cube_corners() {
    assert_eq!(style::rgb_to_xterm_256(0, 0, 0), 16);
    assert_eq!(style::rgb_to_xterm_256(255, 255, 255), 231);
    assert_eq!(style::rgb_to_xterm_256(255, 0, 0), 196);
}

#[test]
fn test_to_text_centers_lines() {
    let text = render("#|Title#|#nbody", &options());
    let out = to_text(&text, &Palette::default(), DEFAULT_POINTS_PER_CELL);
    assert_eq!(out.lines.len(), 2);
    assert_eq!(out.lines[0].alignment, Some(Alignment::Center));
    assert_eq!(out.lines[1].alignment, None);
}

#[test]
fn test_to_text_renders_into_buffer() {
    let text = render("#>Indented#<#nplain", &options());
    let out = to_text(&text, &Palette::default(), DEFAULT_POINTS_PER_CELL);

    let mut terminal = Terminal::new(TestBackend::new(20, 3)).unwrap();
    terminal
        .draw(|frame| frame.render_widget(Paragraph::new(out), frame.area()))
        .unwrap();
    let buffer = terminal.backend().buffer();
    let row = |y: u16| -> String { (0..20u16).map(|x| buffer[(x, y)].symbol()).collect() };
    assert!(row(0).starts_with("  Indented"), "{:?}", row(0));
    assert!(row(1).starts_with("plain"), "{:?}", row(1));
}

#[test]
fn test_write_ansi_plain_output() {
    let text = render("#bHello#b#nWorld", &options());
    let mut out = Vec::new();
    let opts = AnsiOptions {
        color: false,
        ..AnsiOptions::default()
    };
    write_ansi(&mut out, &text, &Palette::default(), &opts).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "Hello\nWorld\n");
}

#[test]
fn test_write_ansi_centers_with_width() {
    let text = render("#|ab#|", &options());
    let mut out = Vec::new();
    let opts = AnsiOptions {
        color: false,
        width: Some(10),
        ..AnsiOptions::default()
    };
    write_ansi(&mut out, &text, &Palette::default(), &opts).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "    ab\n");
}

#[test]
fn test_write_ansi_color_emits_escapes() {
    let text = render("#bHi#b", &options());
    let mut out = Vec::new();
    write_ansi(&mut out, &text, &Palette::default(), &AnsiOptions::default()).unwrap();
    let s = String::from_utf8(out).unwrap();
    assert!(s.contains("\u{1b}["), "{s:?}");
    assert!(s.contains("Hi"));
}
