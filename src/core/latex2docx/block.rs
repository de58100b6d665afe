//! Block classification and rendering
//!
//! Each segmented block is tagged by the first recognizer in [`RECOGNIZERS`]
//! that accepts it, then rendered to zero or more paragraph elements.

use lazy_static::lazy_static;
use regex::Regex;

use crate::data::constants::{
    is_display_math_environment, is_figure_environment, is_list_environment, STYLE_HEADING1,
    STYLE_HEADING2, STYLE_HEADING3, STYLE_LIST_BULLET,
};
use crate::features::figures::Figure;
use crate::utils::error::{ConversionWarning, WarningKind};

use super::context::{ConversionState, DocxOptions, ListKind};
use super::inline::render_inline;
use super::math::render_math;
use super::segment::RawBlock;
use super::utils::{centered_paragraph, command_argument, leading_command_name, paragraph, text_run};

lazy_static! {
    /// A block consisting of a single begin/end marker
    static ref ENVIRONMENT_MARKER: Regex =
        Regex::new(r"^\\(begin|end)\s*\{([A-Za-z*]+)\}$").unwrap();

    /// Begin marker at the start of a block
    static ref LEADING_BEGIN: Regex = Regex::new(r"^\\begin\s*\{([A-Za-z*]+)\}").unwrap();

    /// End marker closing a block
    static ref TRAILING_END: Regex = Regex::new(r"\\end\s*\{[A-Za-z*]+\}\s*$").unwrap();
}

/// Classification tag of a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// Sectioning command; `level` is 1..=3
    Heading { command: String, level: u8 },
    /// Display math environment or `\[..\]` / `$$..$$`
    Equation,
    /// Figure environment
    Figure,
    /// `\item` entry
    ListItem,
    /// Lone `\begin{..}` or `\end{..}`
    EnvironmentMarker { name: String, begin: bool },
    /// Plain paragraph of inline content
    Paragraph,
    /// Starts with an unknown command
    Unrecognized,
}

/// A recognizer returns a tag when it accepts the block text
pub type Recognizer = fn(&str, &ConversionState) -> Option<BlockKind>;

/// Recognizers in priority order; the first match wins
pub const RECOGNIZERS: &[(&str, Recognizer)] = &[
    ("environment-marker", recognize_marker),
    ("heading", recognize_heading),
    ("equation", recognize_equation),
    ("figure", recognize_figure),
    ("list-item", recognize_list_item),
    ("paragraph", recognize_paragraph),
];

// =============================================================================
// Recognizers
// =============================================================================

fn recognize_marker(text: &str, _: &ConversionState) -> Option<BlockKind> {
    let caps = ENVIRONMENT_MARKER.captures(text)?;
    Some(BlockKind::EnvironmentMarker {
        name: caps.get(2)?.as_str().to_string(),
        begin: caps.get(1)?.as_str() == "begin",
    })
}

/// Heading level for a sectioning command
pub fn heading_level(command: &str, has_chapters: bool) -> Option<u8> {
    match command {
        "chapter" => Some(1),
        "section" => Some(2),
        "subsection" if has_chapters => Some(3),
        "subsection" => Some(2),
        "subsubsection" => Some(3),
        _ => None,
    }
}

fn recognize_heading(text: &str, state: &ConversionState) -> Option<BlockKind> {
    let command = leading_command_name(text)?;
    let level = heading_level(command, state.has_chapters)?;
    Some(BlockKind::Heading {
        command: command.to_string(),
        level,
    })
}

fn is_display_dollars(text: &str) -> bool {
    text.len() >= 4
        && text.starts_with("$$")
        && text.ends_with("$$")
        && !text[2..text.len() - 2].contains("$$")
}

fn recognize_equation(text: &str, _: &ConversionState) -> Option<BlockKind> {
    let env_match = LEADING_BEGIN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .is_some_and(|name| is_display_math_environment(name.as_str()));
    (env_match || text.starts_with("\\[") || is_display_dollars(text)).then_some(BlockKind::Equation)
}

fn recognize_figure(text: &str, _: &ConversionState) -> Option<BlockKind> {
    LEADING_BEGIN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .filter(|name| is_figure_environment(name.as_str()))
        .map(|_| BlockKind::Figure)
}

fn recognize_list_item(text: &str, _: &ConversionState) -> Option<BlockKind> {
    (leading_command_name(text) == Some("item")).then_some(BlockKind::ListItem)
}

fn recognize_paragraph(text: &str, _: &ConversionState) -> Option<BlockKind> {
    let Some(rest) = text.strip_prefix('\\') else {
        return Some(BlockKind::Paragraph);
    };
    let accepted = rest.starts_with('(')
        // escaped special characters such as `\$` or `\%`
        || rest.starts_with(&['$', '%', '&', '#', '_', '{', '}'][..])
        || matches!(leading_command_name(text), Some("ref" | "eqref"));
    accepted.then_some(BlockKind::Paragraph)
}

/// Classify trimmed block text
pub fn classify(text: &str, state: &ConversionState) -> BlockKind {
    RECOGNIZERS
        .iter()
        .find_map(|(_, recognize)| recognize(text, state))
        .unwrap_or(BlockKind::Unrecognized)
}

// =============================================================================
// Renderers
// =============================================================================

fn heading_style(level: u8) -> &'static str {
    match level {
        1 => STYLE_HEADING1,
        2 => STYLE_HEADING2,
        _ => STYLE_HEADING3,
    }
}

/// Interior of a display-math block with its delimiters removed
pub fn display_math_body(text: &str) -> &str {
    if let Some(rest) = text.strip_prefix("\\[") {
        return rest.strip_suffix("\\]").unwrap_or(rest).trim();
    }
    if is_display_dollars(text) {
        return text[2..text.len() - 2].trim();
    }
    let start = LEADING_BEGIN.find(text).map_or(0, |m| m.end());
    let end = TRAILING_END
        .find(text)
        .map_or(text.len(), |m| m.start())
        .max(start);
    text[start..end].trim()
}

/// Split `\item[label] rest` into the optional label and the rest
fn split_item(text: &str) -> (Option<&str>, &str) {
    let rest = text.strip_prefix("\\item").unwrap_or(text).trim_start();
    if let Some(inner) = rest.strip_prefix('[') {
        if let Some(close) = inner.find(']') {
            return (Some(inner[..close].trim()), inner[close + 1..].trim());
        }
    }
    (None, rest.trim())
}

fn render_heading(block: &RawBlock, command: &str, level: u8, state: &mut ConversionState) -> String {
    let content = match command_argument(&block.text, command) {
        Some(title) => render_inline(title.trim(), block.line, &mut state.warnings),
        None => {
            state.warn(
                ConversionWarning::new(
                    WarningKind::MissingArgument,
                    format!("\\{} has no braced title", command),
                )
                .at_line(block.line),
            );
            String::new()
        }
    };
    paragraph(Some(heading_style(level)), &content)
}

fn render_marker(block: &RawBlock, name: &str, begin: bool, state: &mut ConversionState) {
    if !is_list_environment(name) {
        return;
    }
    if begin {
        state.enter_list(ListKind::from_environment(name).unwrap_or(ListKind::Bullet));
    } else if !state.leave_list() {
        state.warn(
            ConversionWarning::new(
                WarningKind::UnmatchedListEnd,
                format!("\\end{{{}}} without a matching begin", name),
            )
            .at_line(block.line),
        );
    }
}

fn render_list_item(block: &RawBlock, state: &mut ConversionState, options: &DocxOptions) -> String {
    let (label, rest) = split_item(&block.text);
    let prefix = match label {
        Some(label) => format!("{} ", label),
        None => state.next_item_prefix(options),
    };
    let mut content = text_run(&prefix);
    if !rest.is_empty() {
        content.push_str(&render_inline(rest, block.line, &mut state.warnings));
    }
    paragraph(Some(STYLE_LIST_BULLET), &content)
}

/// Render one block, appending its paragraphs to `out`
pub fn render_block(
    block: &RawBlock,
    state: &mut ConversionState,
    options: &DocxOptions,
    out: &mut Vec<String>,
) {
    match classify(&block.text, state) {
        BlockKind::EnvironmentMarker { name, begin } => render_marker(block, &name, begin, state),
        BlockKind::Heading { command, level } => {
            out.push(render_heading(block, &command, level, state))
        }
        BlockKind::Equation => {
            out.push(centered_paragraph(&render_math(display_math_body(&block.text))))
        }
        BlockKind::Figure => out.extend(Figure::parse(&block.text).to_paragraphs(options)),
        BlockKind::ListItem => out.push(render_list_item(block, state, options)),
        BlockKind::Paragraph => out.push(paragraph(
            None,
            &render_inline(&block.text, block.line, &mut state.warnings),
        )),
        BlockKind::Unrecognized if options.drop_unrecognized => {
            let command = leading_command_name(&block.text).unwrap_or("?");
            state.warn(
                ConversionWarning::new(
                    WarningKind::DroppedBlock,
                    format!("block starting with \\{} was dropped", command),
                )
                .at_line(block.line),
            );
        }
        BlockKind::Unrecognized => out.push(paragraph(
            None,
            &render_inline(&block.text, block.line, &mut state.warnings),
        )),
    }
}

/// Render blocks in order
pub fn render_blocks(
    blocks: &[RawBlock],
    state: &mut ConversionState,
    options: &DocxOptions,
) -> Vec<String> {
    let mut out = Vec::with_capacity(blocks.len());
    for block in blocks {
        render_block(block, state, options, &mut out);
    }
    out
}
