//! LaTeX diagnostics for the DOCX converter
//!
//! A static scan that reports what would go wrong in a conversion without
//! producing any output. It can identify:
//!
//! - Unbalanced braces and environments
//! - Unpaired `$` math delimiters
//! - Empty `\ref{}` / `\eqref{}`
//! - Environments the converter does not render
//! - Blocks that would be dropped as unrecognized
//!
//! ## Example
//!
//! ```rust
//! use texdocx::diagnostics::check_latex;
//!
//! let result = check_latex(r"\begin{itemize}");
//! assert!(result.has_errors());
//! ```

use std::fmt;

use fxhash::FxHashMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::core::latex2docx::block::{classify, BlockKind};
use crate::core::latex2docx::context::ConversionState;
use crate::core::latex2docx::segment::segment;
use crate::core::latex2docx::utils::{
    leading_command_name, strip_comments, strip_labels, LineIndex,
};

lazy_static! {
    static ref ENVIRONMENT_MARKER: Regex =
        Regex::new(r"\\(begin|end)\s*\{([^{}]*)\}").unwrap();

    static ref EMPTY_REFERENCE: Regex = Regex::new(r"\\(ref|eqref)\s*\{\s*\}").unwrap();

    /// Environments that convert poorly, with the reason
    static ref UNRENDERED_ENVIRONMENTS: FxHashMap<&'static str, &'static str> = {
        let mut m = FxHashMap::default();
        m.insert("tabular", "tables are not converted; cells become plain text");
        m.insert("table", "tables are not converted; cells become plain text");
        m.insert("tikzpicture", "TikZ drawings are not converted");
        m.insert("verbatim", "verbatim text is converted like ordinary text");
        m.insert("lstlisting", "code listings are converted like ordinary text");
        m.insert("thebibliography", "bibliographies are not converted");
        m.insert("minipage", "minipage layout is discarded");
        m
    };
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Informational note
    Info,
    /// Output will be degraded
    Warning,
    /// Input is malformed
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    /// 1-based line
    pub line: Option<usize>,
    /// 1-based column, in characters
    pub column: Option<usize>,
    /// Offending source text
    pub source_text: Option<String>,
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            line: None,
            column: None,
            source_text: None,
            suggestion: None,
        }
    }

    pub fn with_location(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn with_source(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // level: message
        //   --> line L:C
        //   | source
        //   = help: suggestion
        write!(f, "{}: {}", self.level, self.message)?;
        if let (Some(line), Some(col)) = (self.line, self.column) {
            write!(f, "\n  --> line {}:{}", line, col)?;
        } else if let Some(line) = self.line {
            write!(f, "\n  --> line {}", line)?;
        }
        if let Some(ref source) = self.source_text {
            write!(f, "\n  |\n  | {}", source)?;
        }
        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  = help: {}", suggestion)?;
        }
        Ok(())
    }
}

/// Check result with per-level counts
#[derive(Debug, Default)]
pub struct CheckResult {
    pub diagnostics: Vec<Diagnostic>,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diag: Diagnostic) {
        match diag.level {
            DiagnosticLevel::Error => self.errors += 1,
            DiagnosticLevel::Warning => self.warnings += 1,
            DiagnosticLevel::Info => self.infos += 1,
        }
        self.diagnostics.push(diag);
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// e.g. "1 error, 2 warnings"
    pub fn summary(&self) -> String {
        fn count(n: usize, noun: &str) -> Option<String> {
            (n > 0).then(|| format!("{} {}{}", n, noun, if n == 1 { "" } else { "s" }))
        }
        let parts: Vec<String> = [
            count(self.errors, "error"),
            count(self.warnings, "warning"),
            count(self.infos, "note"),
        ]
        .into_iter()
        .flatten()
        .collect();
        if parts.is_empty() {
            "no issues found".to_string()
        } else {
            parts.join(", ")
        }
    }

    /// Sort by line, unlocated diagnostics last
    fn sort(&mut self) {
        self.diagnostics
            .sort_by_key(|d| (d.line.unwrap_or(usize::MAX), d.column.unwrap_or(0)));
    }
}

/// Check LaTeX source for conversion problems
pub fn check_latex(input: &str) -> CheckResult {
    let mut result = CheckResult::new();
    // comment stripping keeps line and column positions
    let source = strip_comments(input);
    let lines = LineIndex::new(&source);

    check_brace_balance(&source, &lines, &mut result);
    check_environment_balance(&source, &lines, &mut result);
    check_math_delimiters(&source, &lines, &mut result);
    check_empty_references(&source, &lines, &mut result);
    check_dropped_blocks(&source, &mut result);

    result.sort();
    result
}

/// Byte offsets of characters not escaped by an odd run of backslashes
fn unescaped(source: &str, target: char) -> Vec<usize> {
    let mut found = Vec::new();
    let mut backslashes = 0usize;
    for (i, ch) in source.char_indices() {
        if ch == target && backslashes % 2 == 0 {
            found.push(i);
        }
        backslashes = if ch == '\\' { backslashes + 1 } else { 0 };
    }
    found
}

fn check_brace_balance(source: &str, lines: &LineIndex<'_>, result: &mut CheckResult) {
    let mut braces: Vec<(usize, bool)> = unescaped(source, '{')
        .into_iter()
        .map(|i| (i, true))
        .chain(unescaped(source, '}').into_iter().map(|i| (i, false)))
        .collect();
    braces.sort_unstable();

    let mut open: Vec<usize> = Vec::new();
    for (offset, is_open) in braces {
        if is_open {
            open.push(offset);
        } else if open.pop().is_none() {
            let (line, col) = lines.locate(offset);
            result.add(
                Diagnostic::new(DiagnosticLevel::Error, "unmatched closing brace '}'")
                    .with_location(line, col)
                    .with_suggestion("check for a missing opening brace"),
            );
        }
    }
    for offset in open {
        let (line, col) = lines.locate(offset);
        result.add(
            Diagnostic::new(DiagnosticLevel::Error, "unclosed brace '{'")
                .with_location(line, col)
                .with_suggestion("check for a missing closing brace '}'"),
        );
    }
}

fn check_environment_balance(source: &str, lines: &LineIndex<'_>, result: &mut CheckResult) {
    let mut stack: Vec<(&str, usize)> = Vec::new();
    for caps in ENVIRONMENT_MARKER.captures_iter(source) {
        let (Some(m), Some(kind), Some(name)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let name = name.as_str().trim();
        let (line, col) = lines.locate(m.start());

        if kind.as_str() == "begin" {
            if let Some(reason) = UNRENDERED_ENVIRONMENTS.get(name) {
                result.add(
                    Diagnostic::new(DiagnosticLevel::Warning, *reason)
                        .with_location(line, col)
                        .with_source(m.as_str()),
                );
            }
            stack.push((name, line));
            continue;
        }

        match stack.pop() {
            Some((open, _)) if open == name => {}
            Some((open, open_line)) => result.add(
                Diagnostic::new(
                    DiagnosticLevel::Error,
                    format!(
                        "mismatched environment: '{}' opened at line {} is closed by '{}'",
                        open, open_line, name
                    ),
                )
                .with_location(line, col)
                .with_suggestion(format!("use \\end{{{}}}", open)),
            ),
            None => result.add(
                Diagnostic::new(
                    DiagnosticLevel::Error,
                    format!("\\end{{{}}} without a matching \\begin", name),
                )
                .with_location(line, col),
            ),
        }
    }
    for (name, line) in stack {
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Error,
                format!("unclosed environment '{}'", name),
            )
            .with_location(line, 1)
            .with_suggestion(format!("add \\end{{{}}}", name)),
        );
    }
}

fn check_math_delimiters(source: &str, lines: &LineIndex<'_>, result: &mut CheckResult) {
    let dollars = unescaped(source, '$');
    if dollars.len() % 2 == 1 {
        let (line, col) = lines.locate(dollars[dollars.len() - 1]);
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Warning,
                "odd number of '$' delimiters; the last math span is never closed",
            )
            .with_location(line, col)
            .with_suggestion("write a literal dollar sign as \\$"),
        );
    }
}

fn check_empty_references(source: &str, lines: &LineIndex<'_>, result: &mut CheckResult) {
    for m in EMPTY_REFERENCE.find_iter(source) {
        let (line, col) = lines.locate(m.start());
        result.add(
            Diagnostic::new(DiagnosticLevel::Warning, "reference without an id renders as '??'")
                .with_location(line, col)
                .with_source(m.as_str()),
        );
    }
}

fn check_dropped_blocks(source: &str, result: &mut CheckResult) {
    // same cleanup as the converter; labels vanish without a trace there
    let source = strip_labels(source);
    let state = ConversionState::for_source(&source);
    let mut ignored = Vec::new();
    for block in segment(&source, &mut ignored) {
        if classify(&block.text, &state) != BlockKind::Unrecognized {
            continue;
        }
        let command = leading_command_name(&block.text).unwrap_or("?");
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Info,
                format!("block starting with \\{} will be dropped", command),
            )
            .with_location(block.line, 1)
            .with_suggestion("convert with --keep-unknown to keep it as a paragraph"),
        );
    }
}

/// Format check results for terminal output
pub fn format_diagnostics(result: &CheckResult, use_color: bool) -> String {
    let mut output = String::new();

    for diag in &result.diagnostics {
        if use_color {
            let color = match diag.level {
                DiagnosticLevel::Error => "\x1b[31m",
                DiagnosticLevel::Warning => "\x1b[33m",
                DiagnosticLevel::Info => "\x1b[34m",
            };
            output.push_str(&format!("{}{}\x1b[0m\n\n", color, diag));
        } else {
            output.push_str(&format!("{}\n\n", diag));
        }
    }

    let summary = format!("Summary: {}", result.summary());
    if use_color {
        let color = if result.has_errors() {
            "\x1b[31m"
        } else if result.warnings > 0 {
            "\x1b[33m"
        } else {
            "\x1b[32m"
        };
        output.push_str(&format!("{}{}\x1b[0m", color, summary));
    } else {
        output.push_str(&summary);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_document() {
        let result = check_latex("\\section{Intro}\n\nValue $x_i$ and \\ref{eq1}.");
        assert!(result.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(result.summary(), "no issues found");
    }

    #[test]
    fn test_unbalanced_braces() {
        let result = check_latex(r"\frac{1}{2");
        assert!(result.has_errors());
        assert_eq!(result.diagnostics[0].column, Some(9));
    }

    #[test]
    fn test_escaped_braces_ignored() {
        assert!(!check_latex(r"a \{ b").has_errors());
    }

    #[test]
    fn test_extra_closing_brace() {
        let result = check_latex("ok\nx}");
        assert_eq!(result.errors, 1);
        assert_eq!(result.diagnostics[0].line, Some(2));
        assert_eq!(result.diagnostics[0].column, Some(2));
    }

    #[test]
    fn test_unclosed_environment() {
        let result = check_latex(r"\begin{itemize}");
        assert!(result.has_errors());
    }

    #[test]
    fn test_mismatched_environments() {
        let result = check_latex(r"\begin{equation}x=1\end{align}");
        assert!(result.diagnostics[0].message.contains("mismatched"));
    }

    #[test]
    fn test_odd_dollars_warn() {
        let result = check_latex(r"costs $5 and \$6");
        assert_eq!(result.warnings, 1);
        assert_eq!(check_latex(r"$a$ and \$").warnings, 0);
    }

    #[test]
    fn test_empty_reference_warns() {
        let result = check_latex(r"see \ref{}");
        assert_eq!(result.warnings, 1);
        assert_eq!(result.diagnostics[0].source_text.as_deref(), Some(r"\ref{}"));
    }

    #[test]
    fn test_dropped_block_info() {
        let result = check_latex("\\maketitle\n\nText");
        assert_eq!(result.infos, 1);
        assert!(result.diagnostics[0].message.contains("\\maketitle"));
    }

    #[test]
    fn test_label_block_not_reported() {
        let result = check_latex("\\section{A}\n\n\\label{sec:a}\n\nText");
        assert!(result.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn test_unrendered_environment_warns() {
        let result = check_latex("\\begin{tabular}{cc}\na & b\n\\end{tabular}");
        assert_eq!(result.errors, 0);
        assert!(result.warnings >= 1);
    }

    #[test]
    fn test_comments_ignored() {
        assert!(check_latex("text % {unbalanced").is_empty());
    }

    #[test]
    fn test_multibyte_columns() {
        let result = check_latex("αβ}");
        assert_eq!(result.diagnostics[0].column, Some(3));
    }

    #[test]
    fn test_summary_and_format() {
        let mut result = CheckResult::new();
        result.add(Diagnostic::new(DiagnosticLevel::Error, "bad"));
        result.add(Diagnostic::new(DiagnosticLevel::Warning, "meh"));
        assert_eq!(result.summary(), "1 error, 1 warning");
        let text = format_diagnostics(&result, false);
        assert!(text.contains("error: bad"));
        assert!(text.ends_with("Summary: 1 error, 1 warning"));
        assert!(format_diagnostics(&result, true).contains("\x1b[31m"));
    }
}
