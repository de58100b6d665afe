//! Utility functions for LaTeX to DOCX conversion
//!
//! This module contains pure utility functions that don't depend on converter state.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Label commands carry no visible content
    static ref LABEL_COMMAND: Regex = Regex::new(r"\\label\s*\{[^{}]*\}").unwrap();
}

// =============================================================================
// Text Processing Utilities
// =============================================================================

/// Escape text for use in XML character data and attribute values.
/// Characters XML 1.0 cannot carry (form feed, other C0 controls) become spaces.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' | '\n' | '\r' => out.push(ch),
            '\u{0}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}' => out.push(' '),
            _ => out.push(ch),
        }
    }
    out
}

/// Remove `%` line comments. An escaped `\%` is kept, `\\%` still starts a comment.
pub fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for (i, line) in source.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&line[..comment_start(line).unwrap_or(line.len())]);
    }
    out
}

/// Byte offset of the first unescaped `%` in a line
fn comment_start(line: &str) -> Option<usize> {
    let mut backslashes = 0usize;
    for (i, ch) in line.char_indices() {
        if ch == '%' && backslashes % 2 == 0 {
            return Some(i);
        }
        if ch == '\\' {
            backslashes += 1;
        } else {
            backslashes = 0;
        }
    }
    None
}

/// Remove `\label{...}` commands
pub fn strip_labels(source: &str) -> String {
    LABEL_COMMAND.replace_all(source, "").into_owned()
}

// =============================================================================
// Argument Extraction
// =============================================================================

/// Extract a balanced `{...}` group starting at byte `open` (which must be `{`).
///
/// Returns the inner content and the byte offset just past the closing brace.
/// Escaped braces (`\{`, `\}`) do not count. Returns `None` when unclosed.
pub fn extract_braced(text: &str, open: usize) -> Option<(&str, usize)> {
    if !text[open..].starts_with('{') {
        return None;
    }
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, ch) in text[open..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = open + i;
                    return Some((&text[open + 1..end], end + 1));
                }
            }
            _ => {}
        }
    }
    None
}

/// Skip whitespace, a `*` star and any `[...]` optional arguments after a command name
fn skip_command_decorations(text: &str, mut pos: usize) -> usize {
    let bytes = text.as_bytes();
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    if pos < bytes.len() && bytes[pos] == b'*' {
        pos += 1;
    }
    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos < bytes.len() && bytes[pos] == b'[' {
            match text[pos..].find(']') {
                Some(close) => pos += close + 1,
                None => return pos,
            }
        } else {
            return pos;
        }
    }
}

/// Find `\name` in `text` and return its first braced argument.
///
/// Handles `\name*{..}` and `\name[opt]{..}`. The command name must not be
/// followed by another letter, so `\section` does not match `\sectionmark`.
pub fn command_argument<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("\\{}", name);
    let mut search = 0;
    while let Some(rel) = text[search..].find(&needle) {
        let after = search + rel + needle.len();
        let next = text[after..].chars().next();
        if next.is_some_and(|c| c.is_ascii_alphabetic()) {
            search = after;
            continue;
        }
        let open = skip_command_decorations(text, after);
        return extract_braced(text, open).map(|(arg, _)| arg);
    }
    None
}

/// Byte offset just past a leading command's first braced argument.
///
/// Used to split `\section{Title} Body text` into the heading and the body.
pub fn end_of_leading_command(text: &str) -> Option<usize> {
    let rest = text.strip_prefix('\\')?;
    let name_len = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    if name_len == 0 {
        return None;
    }
    let open = skip_command_decorations(text, 1 + name_len);
    extract_braced(text, open).map(|(_, end)| end)
}

/// Name of the leading command in `text` (without backslash), if any
pub fn leading_command_name(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('\\')?;
    let len = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    if len == 0 {
        None
    } else {
        Some(&rest[..len])
    }
}

/// Byte offsets of line starts, for repeated offset lookups
pub struct LineIndex<'a> {
    source: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut starts = vec![0];
        starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { source, starts }
    }

    /// 1-based line of a byte offset
    pub fn line(&self, offset: usize) -> usize {
        self.starts.partition_point(|&s| s <= offset).max(1)
    }

    /// 1-based line and character column of a byte offset
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source.len());
        let line = self.line(offset);
        let column = self.source[self.starts[line - 1]..offset].chars().count() + 1;
        (line, column)
    }
}

// =============================================================================
// WordprocessingML builders
// =============================================================================

/// A plain text run with whitespace preserved
pub fn text_run(text: &str) -> String {
    format!(
        "<w:r><w:t xml:space=\"preserve\">{}</w:t></w:r>",
        escape_xml(text)
    )
}

/// A run with run properties (`<w:b/>`, `<w:i/>`, ...)
pub fn styled_run(props: &str, text: &str) -> String {
    format!(
        "<w:r><w:rPr>{}</w:rPr><w:t xml:space=\"preserve\">{}</w:t></w:r>",
        props,
        escape_xml(text)
    )
}

/// A paragraph with an optional named style
pub fn paragraph(style: Option<&str>, content: &str) -> String {
    match style {
        Some(id) => format!(
            "<w:p><w:pPr><w:pStyle w:val=\"{}\"/></w:pPr>{}</w:p>",
            id, content
        ),
        None => format!("<w:p>{}</w:p>", content),
    }
}

/// A horizontally centered paragraph
pub fn centered_paragraph(content: &str) -> String {
    format!(
        "<w:p><w:pPr><w:jc w:val=\"center\"/></w:pPr>{}</w:p>",
        content
    )
}
