//! Figure handling for LaTeX → DOCX conversion
//!
//! This module provides support for:
//! - `\includegraphics[options]{path}` inside a figure environment (options ignored)
//! - `\caption{...}` with nested braces
//!
//! Image data is never embedded; a figure becomes an italic placeholder
//! naming the image path, followed by a caption paragraph.

use crate::core::latex2docx::context::DocxOptions;
use crate::core::latex2docx::utils::{centered_paragraph, command_argument, styled_run, text_run};

/// A parsed figure environment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Figure {
    /// Path argument of `\includegraphics`, empty when absent
    pub path: String,
    /// Caption text, `None` when absent or empty
    pub caption: Option<String>,
}

impl Figure {
    /// Parse the text of a figure environment
    pub fn parse(block: &str) -> Self {
        let caption = command_argument(block, "caption")
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        Self {
            path: command_argument(block, "includegraphics")
                .map(|p| p.trim().to_string())
                .unwrap_or_default(),
            caption,
        }
    }

    /// Placeholder text shown in place of the image
    pub fn placeholder(&self) -> String {
        format!("[IMAGE PLACEHOLDER: {}]", self.path)
    }

    /// Caption line including the configured prefix
    pub fn caption_line(&self, options: &DocxOptions) -> String {
        let caption = self
            .caption
            .as_deref()
            .unwrap_or(options.default_caption.as_str());
        format!("{}{}", options.caption_prefix, caption)
    }

    /// Two centered paragraphs: italic placeholder, then caption
    pub fn to_paragraphs(&self, options: &DocxOptions) -> Vec<String> {
        vec![
            centered_paragraph(&styled_run("<w:i/>", &self.placeholder())),
            centered_paragraph(&text_run(&self.caption_line(options))),
        ]
    }
}
