//! Inline content handling for LaTeX to DOCX conversion
//!
//! A block's text is split in one pass into plain text, inline math and
//! cross-reference spans. Span order is preserved exactly; adjacent spans
//! of different kinds are never merged.

use lazy_static::lazy_static;
use regex::Regex;

use crate::utils::error::{ConversionWarning, WarningKind};

use super::math::render_math;
use super::utils::{styled_run, text_run};

lazy_static! {
    /// Line break `\\` or escaped dollar, `\(..\)`, `$$..$$`, `$..$`,
    /// `\ref{..}` / `\eqref{..}`. Backslash pairs are consumed first so the
    /// parity of a backslash run decides whether a `$` is escaped.
    static ref INLINE_SPAN: Regex = Regex::new(
        r"(?s)(\\\\|\\\$)|\\\((.+?)\\\)|\$\$(.+?)\$\$|\$(.+?)\$|\\(ref|eqref)\s*\{([^{}]*)\}"
    ).unwrap();
}

/// How a reference is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefStyle {
    /// `\ref{id}` → `id`
    Plain,
    /// `\eqref{id}` → `(id)`
    Equation,
}

/// A typed fragment of block text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineSpan<'a> {
    /// Literal text
    Text(&'a str),
    /// Math-mode interior, delimiters stripped
    Math(&'a str),
    /// Cross-reference; `None` when the braces were empty
    Reference { id: Option<&'a str>, style: RefStyle },
}

/// Split text into spans in source order. Empty spans are skipped.
pub fn split_spans(text: &str) -> Vec<InlineSpan<'_>> {
    let mut spans = Vec::new();
    let mut last = 0;
    for caps in INLINE_SPAN.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        if caps.get(1).is_some() {
            // `\\` and `\$` stay part of the surrounding text
            continue;
        }
        if m.start() > last {
            spans.push(InlineSpan::Text(&text[last..m.start()]));
        }
        last = m.end();

        if let Some(math) = caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4)) {
            spans.push(InlineSpan::Math(math.as_str()));
        } else if let (Some(cmd), Some(arg)) = (caps.get(5), caps.get(6)) {
            let id = arg.as_str().trim();
            let style = if cmd.as_str() == "eqref" {
                RefStyle::Equation
            } else {
                RefStyle::Plain
            };
            spans.push(InlineSpan::Reference {
                id: (!id.is_empty()).then_some(id),
                style,
            });
        }
    }
    if last < text.len() {
        spans.push(InlineSpan::Text(&text[last..]));
    }
    spans
}

/// Render one span as WordprocessingML / OMML
fn render_span(span: &InlineSpan<'_>, out: &mut String) {
    match span {
        InlineSpan::Text(text) => out.push_str(&text_run(text)),
        InlineSpan::Math(expr) => out.push_str(&render_math(expr)),
        InlineSpan::Reference { id, style } => {
            let id = id.unwrap_or("??");
            let label = match style {
                RefStyle::Plain => id.to_string(),
                RefStyle::Equation => format!("({})", id),
            };
            out.push_str(&styled_run("<w:b/>", &label));
        }
    }
}

/// Render inline text, recording problems into `warnings`
pub fn render_inline(text: &str, line: usize, warnings: &mut Vec<ConversionWarning>) -> String {
    let mut out = String::new();
    for span in split_spans(text) {
        if let InlineSpan::Reference { id: None, .. } = span {
            warnings.push(
                ConversionWarning::new(WarningKind::EmptyReference, "reference without an id")
                    .at_line(line),
            );
        }
        render_span(&span, &mut out);
    }
    out
}

/// Render inline text as a concatenation of runs and math containers
pub fn process_inline(text: &str) -> String {
    let mut out = String::new();
    for span in split_spans(text) {
        render_span(&span, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_order() {
        assert_eq!(
            split_spans(r"Value is $x_i$ and \ref{eq1}."),
            vec![
                InlineSpan::Text("Value is "),
                InlineSpan::Math("x_i"),
                InlineSpan::Text(" and "),
                InlineSpan::Reference {
                    id: Some("eq1"),
                    style: RefStyle::Plain
                },
                InlineSpan::Text("."),
            ]
        );
    }

    #[test]
    fn test_paren_math_and_adjacent_spans() {
        assert_eq!(
            split_spans(r"\(a\)$b$"),
            vec![InlineSpan::Math("a"), InlineSpan::Math("b")]
        );
    }

    #[test]
    fn test_escaped_dollar_is_text() {
        assert_eq!(
            split_spans(r"costs \$5 and \$6"),
            vec![InlineSpan::Text(r"costs \$5 and \$6")]
        );
    }

    #[test]
    fn test_line_break_before_dollar() {
        assert_eq!(
            split_spans(r"line\\$x_i$ end"),
            vec![
                InlineSpan::Text(r"line\\"),
                InlineSpan::Math("x_i"),
                InlineSpan::Text(" end"),
            ]
        );
        assert_eq!(
            split_spans(r"a\\\$5"),
            vec![InlineSpan::Text(r"a\\\$5")]
        );
    }

    #[test]
    fn test_display_dollars_inline() {
        assert_eq!(split_spans("$$x$$"), vec![InlineSpan::Math("x")]);
    }

    #[test]
    fn test_reference_run() {
        assert_eq!(
            process_inline(r"\ref{eq1}"),
            "<w:r><w:rPr><w:b/></w:rPr><w:t xml:space=\"preserve\">eq1</w:t></w:r>"
        );
    }

    #[test]
    fn test_empty_reference_falls_back() {
        let mut warnings = Vec::new();
        let out = render_inline(r"see \ref{}", 4, &mut warnings);
        assert!(out.contains(">??</w:t>"));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].line, Some(4));
    }

    #[test]
    fn test_eqref() {
        assert!(process_inline(r"\eqref{e1}").contains(">(e1)</w:t>"));
    }

    #[test]
    fn test_plain_text_preserves_space_and_escapes() {
        assert_eq!(
            process_inline(" a & b "),
            "<w:r><w:t xml:space=\"preserve\"> a &amp; b </w:t></w:r>"
        );
    }

    #[test]
    fn test_unclosed_math_is_text() {
        assert_eq!(split_spans("price $5"), vec![InlineSpan::Text("price $5")]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(process_inline(""), "");
    }
}
