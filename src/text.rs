//! Small string helpers used around markup: line joining, URL encoding and
//! comma-separated lists.

use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters escaped in a URL while keeping its structure (`:/?#&=` ...).
const URL_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^');

/// Everything except RFC 3986 unreserved characters.
const NOT_UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Replace single line breaks with spaces; runs of two or more are kept.
pub fn remove_single_line_breaks(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    for (i, &ch) in chars.iter().enumerate() {
        let lone_break = ch == '\n'
            && (i == 0 || chars[i - 1] != '\n')
            && chars.get(i + 1).is_none_or(|&next| next != '\n');
        out.push(if lone_break { ' ' } else { ch });
    }
    out
}

/// Append a space unless `s` is empty or already ends in whitespace.
pub fn with_trailing_space_if_needed(s: &str) -> String {
    match s.chars().last() {
        Some(last) if !last.is_whitespace() => format!("{s} "),
        _ => s.to_string(),
    }
}

pub fn first_char(s: &str) -> Option<char> {
    s.chars().next()
}

pub fn last_char(s: &str) -> Option<char> {
    s.chars().next_back()
}

/// Percent-encode characters that are never valid in a URL, leaving
/// separators intact.
pub fn percent_encode_url(s: &str) -> String {
    utf8_percent_encode(s, URL_UNSAFE).to_string()
}

/// Percent-encode everything except unreserved characters, for query values.
pub fn fully_percent_encode(s: &str) -> String {
    utf8_percent_encode(s, NOT_UNRESERVED).to_string()
}

pub fn has_case_insensitive_substring(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Keep only ASCII digits.
pub fn just_numbers(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// Split on commas, trimming items and dropping empty ones.
pub fn split_comma_separated(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

pub fn join_comma_separated<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    join_with(items, ", ")
}

pub fn join_with<I>(items: I, separator: &str) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out = String::new();
    for (index, item) in items.into_iter().enumerate() {
        if index > 0 {
            out.push_str(separator);
        }
        out.push_str(item.as_ref());
    }
    out
}
