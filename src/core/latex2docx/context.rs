//! Conversion options and per-document parse state
//!
//! `ConversionState` is created fresh for every conversion call and passed
//! explicitly through segmentation and classification. Nothing here is
//! global, so independent conversions never interfere.

use lazy_static::lazy_static;
use regex::Regex;

use crate::utils::error::{ConversionWarning, WarningKind};

// =============================================================================
// LaTeX → DOCX Conversion Options
// =============================================================================

/// Options for LaTeX to DOCX conversion
#[derive(Debug, Clone, PartialEq)]
pub struct DocxOptions {
    /// Drop blocks that start with an unrecognized command
    /// Default: true
    pub drop_unrecognized: bool,

    /// Remove `%` line comments before segmentation
    /// Default: true
    pub strip_comments: bool,

    /// Text of the run that prefixes `itemize` entries
    /// Default: "• "
    pub bullet: String,

    /// Prefix of the figure caption paragraph
    /// Default: "Fig: "
    pub caption_prefix: String,

    /// Caption used when a figure has no `\caption{}`
    /// Default: "Figure"
    pub default_caption: String,
}

impl Default for DocxOptions {
    fn default() -> Self {
        Self {
            drop_unrecognized: true,
            strip_comments: true,
            bullet: "• ".to_string(),
            caption_prefix: "Fig: ".to_string(),
            default_caption: "Figure".to_string(),
        }
    }
}

impl DocxOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep unrecognized command blocks as plain paragraphs instead of dropping them
    pub fn lenient() -> Self {
        Self {
            drop_unrecognized: false,
            ..Self::default()
        }
    }
}

lazy_static! {
    static ref CHAPTER_COMMAND: Regex = Regex::new(r"\\chapter\b").unwrap();
}

// =============================================================================
// Parse state
// =============================================================================

/// Kind of the list environment currently open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `itemize`
    Bullet,
    /// `enumerate`
    Numbered,
}

impl ListKind {
    /// List kind for an environment name
    pub fn from_environment(name: &str) -> Option<Self> {
        match name {
            "itemize" => Some(ListKind::Bullet),
            "enumerate" => Some(ListKind::Numbered),
            _ => None,
        }
    }
}

/// State threaded through one conversion pass
#[derive(Debug, Clone, Default)]
pub struct ConversionState {
    /// Inside an itemize-like environment
    pub in_list: bool,
    /// Kind of the open list, if any
    pub list_kind: Option<ListKind>,
    /// Items emitted in the open numbered list
    pub item_number: usize,
    /// The document uses chapter-level headings
    pub has_chapters: bool,
    /// Non-fatal problems found so far
    pub warnings: Vec<ConversionWarning>,
}

impl ConversionState {
    /// Fresh state for a cleaned document source
    pub fn for_source(source: &str) -> Self {
        Self {
            has_chapters: CHAPTER_COMMAND.is_match(source),
            ..Self::default()
        }
    }

    /// Enter a list environment
    pub fn enter_list(&mut self, kind: ListKind) {
        self.in_list = true;
        self.list_kind = Some(kind);
        self.item_number = 0;
    }

    /// Leave a list environment; returns false when no list was open
    pub fn leave_list(&mut self) -> bool {
        let was_open = self.in_list;
        self.in_list = false;
        self.list_kind = None;
        self.item_number = 0;
        was_open
    }

    /// Prefix text for the next list item
    pub fn next_item_prefix(&mut self, options: &DocxOptions) -> String {
        match self.list_kind {
            Some(ListKind::Numbered) => {
                self.item_number += 1;
                format!("{}. ", self.item_number)
            }
            _ => options.bullet.clone(),
        }
    }

    /// Record a warning
    pub fn warn(&mut self, warning: ConversionWarning) {
        self.warnings.push(warning);
    }

    /// End-of-document checks; consumes the state and returns its warnings
    pub fn finish(mut self) -> Vec<ConversionWarning> {
        if self.in_list {
            let env = match self.list_kind {
                Some(ListKind::Numbered) => "enumerate",
                _ => "itemize",
            };
            self.warnings.push(
                ConversionWarning::new(
                    WarningKind::UnclosedList,
                    format!("{} environment still open at end of document", env),
                )
                .with_suggestion(format!("add \\end{{{}}}", env)),
            );
        }
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_presets() {
        let opts = DocxOptions::new();
        assert!(opts.drop_unrecognized);
        assert_eq!(opts.bullet, "• ");
        let lenient = DocxOptions::lenient();
        assert!(!lenient.drop_unrecognized);
        assert_eq!(lenient.caption_prefix, "Fig: ");
    }

    #[test]
    fn test_state_starts_outside_list() {
        let state = ConversionState::for_source("plain text");
        assert!(!state.in_list);
        assert!(!state.has_chapters);
        assert!(ConversionState::for_source(r"\chapter{One}").has_chapters);
        assert!(!ConversionState::for_source(r"\chapterstyle{x}").has_chapters);
    }

    #[test]
    fn test_list_toggle() {
        let mut state = ConversionState::default();
        state.enter_list(ListKind::Bullet);
        assert!(state.in_list);
        assert!(state.leave_list());
        assert!(!state.in_list);
        assert!(!state.leave_list());
    }

    #[test]
    fn test_numbered_prefix() {
        let opts = DocxOptions::default();
        let mut state = ConversionState::default();
        state.enter_list(ListKind::Numbered);
        assert_eq!(state.next_item_prefix(&opts), "1. ");
        assert_eq!(state.next_item_prefix(&opts), "2. ");
        state.enter_list(ListKind::Bullet);
        assert_eq!(state.next_item_prefix(&opts), "• ");
    }

    #[test]
    fn test_finish_reports_open_list() {
        let mut state = ConversionState::default();
        state.enter_list(ListKind::Bullet);
        let warnings = state.finish();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::UnclosedList);
    }
}
