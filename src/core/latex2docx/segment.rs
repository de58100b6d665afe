//! Block segmentation
//!
//! Splits cleaned source into blocks on blank lines and on environment
//! begin/end markers. Markers are kept as blocks of their own so that list
//! boundaries can be classified individually. Display-math and figure
//! environments are gathered whole, marker to marker, so their interior
//! reaches the renderer in one piece.

use lazy_static::lazy_static;
use regex::Regex;

use crate::data::constants::{
    is_display_math_environment, is_figure_environment, is_list_environment,
};
use crate::utils::error::{ConversionWarning, WarningKind};

use super::utils::{end_of_leading_command, LineIndex};

lazy_static! {
    /// Environment markers and blank-line separators
    static ref BLOCK_SEPARATOR: Regex = Regex::new(
        r"\\(begin|end)\s*\{([A-Za-z*]+)\}|\n[ \t\r]*\n"
    ).unwrap();

    /// Commands that start a new block; `\item` only inside a list
    static ref BLOCK_COMMAND: Regex = Regex::new(
        r"\\(chapter|section|subsection|subsubsection|item)\b"
    ).unwrap();
}

/// A block of source text in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    /// Trimmed block text
    pub text: String,
    /// 1-based line of the block start in the cleaned source
    pub line: usize,
}

/// One piece produced by the separator split
#[derive(Debug)]
enum Piece<'a> {
    Text { start: usize, end: usize },
    Begin { name: &'a str, start: usize, end: usize },
    End { name: &'a str, start: usize, end: usize },
}

fn split_pieces(source: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for caps in BLOCK_SEPARATOR.captures_iter(source) {
        let Some(m) = caps.get(0) else { continue };
        if m.start() > last {
            pieces.push(Piece::Text {
                start: last,
                end: m.start(),
            });
        }
        if let (Some(kind), Some(name)) = (caps.get(1), caps.get(2)) {
            let (start, end) = (m.start(), m.end());
            let name = name.as_str();
            if kind.as_str() == "begin" {
                pieces.push(Piece::Begin { name, start, end });
            } else {
                pieces.push(Piece::End { name, start, end });
            }
        }
        last = m.end();
    }
    if last < source.len() {
        pieces.push(Piece::Text {
            start: last,
            end: source.len(),
        });
    }
    pieces
}

/// Index of the piece closing the environment opened at `open`
fn find_matching_end(pieces: &[Piece<'_>], open: usize, env: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, piece) in pieces.iter().enumerate().skip(open + 1) {
        match piece {
            Piece::Begin { name, .. } if *name == env => depth += 1,
            Piece::End { name, .. } if *name == env => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

fn push_block(
    blocks: &mut Vec<RawBlock>,
    lines: &LineIndex<'_>,
    source: &str,
    start: usize,
    end: usize,
) {
    let raw = &source[start..end];
    let text = raw.trim();
    if text.is_empty() {
        return;
    }
    let lead = raw.len() - raw.trim_start().len();
    blocks.push(RawBlock {
        text: text.to_string(),
        line: lines.line(start + lead),
    });
}

/// Split a text piece before block commands (`\item` only inside a list), and after a heading's title
fn push_text_piece(
    blocks: &mut Vec<RawBlock>,
    lines: &LineIndex<'_>,
    source: &str,
    (start, end): (usize, usize),
    in_list: bool,
) {
    let piece = &source[start..end];
    let mut cuts = vec![0];
    for caps in BLOCK_COMMAND.captures_iter(piece) {
        let (Some(m), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if m.start() < *cuts.last().unwrap_or(&0) || (name.as_str() == "item" && !in_list) {
            continue;
        }
        cuts.push(m.start());
        if name.as_str() != "item" {
            if let Some(title_end) = end_of_leading_command(&piece[m.start()..]) {
                cuts.push(m.start() + title_end);
            }
        }
    }
    cuts.push(piece.len());
    for pair in cuts.windows(2) {
        push_block(blocks, lines, source, start + pair[0], start + pair[1]);
    }
}

/// Split cleaned source into blocks.
///
/// Unclosed display-math or figure environments extend to the end of the
/// input and are reported through `warnings`.
pub fn segment(source: &str, warnings: &mut Vec<ConversionWarning>) -> Vec<RawBlock> {
    let pieces = split_pieces(source);
    let lines = LineIndex::new(source);
    let mut blocks = Vec::new();
    let mut list_depth = 0usize;
    let mut i = 0;
    while i < pieces.len() {
        match &pieces[i] {
            Piece::Text { start, end } => {
                push_text_piece(&mut blocks, &lines, source, (*start, *end), list_depth > 0)
            }
            Piece::Begin { name, start, end }
                if is_display_math_environment(name) || is_figure_environment(name) =>
            {
                match find_matching_end(&pieces, i, name) {
                    Some(close) => {
                        let close_end = match &pieces[close] {
                            Piece::End { end, .. } => *end,
                            _ => *end,
                        };
                        push_block(&mut blocks, &lines, source, *start, close_end);
                        i = close;
                    }
                    None => {
                        warnings.push(
                            ConversionWarning::new(
                                WarningKind::UnclosedEnvironment,
                                format!("environment '{}' is never closed", name),
                            )
                            .at_line(lines.line(*start))
                            .with_suggestion(format!("add \\end{{{}}}", name)),
                        );
                        push_block(&mut blocks, &lines, source, *start, source.len());
                        i = pieces.len();
                    }
                }
            }
            Piece::Begin { name, start, end } => {
                if is_list_environment(name) {
                    list_depth += 1;
                }
                push_block(&mut blocks, &lines, source, *start, *end)
            }
            Piece::End { name, start, end } => {
                if is_list_environment(name) {
                    list_depth = list_depth.saturating_sub(1);
                }
                push_block(&mut blocks, &lines, source, *start, *end)
            }
        }
        i += 1;
    }
    blocks
}
