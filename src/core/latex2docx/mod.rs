//! LaTeX to DOCX conversion module
//!
//! This module converts a constrained LaTeX subset into WordprocessingML body
//! content, with math rendered as OMML.
//!
//! # Module Structure
//!
//! - `context`: Options (`DocxOptions`) and per-call parse state (`ConversionState`)
//! - `segment`: Splits cleaned source into blocks and environment markers
//! - `block`: Ordered recognizer table and per-kind block renderers
//! - `inline`: Text / math / reference span splitting
//! - `math`: Recursive-descent math parser and OMML writer
//! - `utils`: Argument extraction, comment stripping and XML builders
//!
//! # Example
//!
//! ```rust
//! use texdocx::core::latex2docx::{DocxConverter, DocxOptions};
//!
//! let converter = DocxConverter::with_options(DocxOptions::lenient());
//! let body = converter.convert_body(r"\section{Intro}");
//! assert!(body.contains("Heading2"));
//! ```

// Submodules
pub mod block;
pub mod context;
pub mod inline;
pub mod math;
pub mod segment;
pub mod utils;

pub use block::{classify, BlockKind, RECOGNIZERS};
pub use context::{ConversionState, DocxOptions, ListKind};
pub use inline::{process_inline, InlineSpan};
pub use math::{parse_math, render_math, MathNode};
pub use segment::{segment, RawBlock};

use crate::data::constants::{M_NAMESPACE, W_NAMESPACE, XML_DECLARATION};
use crate::utils::error::{ConversionOutput, ConversionWarning};

// =============================================================================
// Converter
// =============================================================================

/// LaTeX → DOCX converter holding its options
#[derive(Debug, Clone, Default)]
pub struct DocxConverter {
    options: DocxOptions,
}

impl DocxConverter {
    /// Create a converter with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a converter with custom options
    pub fn with_options(options: DocxOptions) -> Self {
        Self { options }
    }

    /// Get a reference to the current options
    pub fn options(&self) -> &DocxOptions {
        &self.options
    }

    /// Remove comments (when enabled) and label commands
    pub fn preprocess(&self, source: &str) -> String {
        let cleaned = if self.options.strip_comments {
            utils::strip_comments(source)
        } else {
            source.to_string()
        };
        utils::strip_labels(&cleaned)
    }

    /// Rendered paragraphs in document order, plus warnings
    pub fn classify(&self, source: &str) -> (Vec<String>, Vec<ConversionWarning>) {
        let cleaned = self.preprocess(source);
        // fresh state per call
        let mut state = ConversionState::for_source(&cleaned);
        let blocks = segment(&cleaned, &mut state.warnings);
        let paragraphs = block::render_blocks(&blocks, &mut state, &self.options);
        let mut warnings = state.finish();
        warnings.sort_by_key(|w| w.line.unwrap_or(usize::MAX));
        (paragraphs, warnings)
    }

    /// The `<w:body>` element
    pub fn convert_body(&self, source: &str) -> String {
        assemble_body(&self.classify(source).0)
    }

    /// The complete `word/document.xml` part
    pub fn convert_document(&self, source: &str) -> String {
        assemble_document(&self.convert_body(source))
    }

    /// The complete document part together with warnings
    pub fn convert_with_diagnostics(&self, source: &str) -> ConversionOutput {
        let (paragraphs, warnings) = self.classify(source);
        ConversionOutput::with_warnings(assemble_document(&assemble_body(&paragraphs)), warnings)
    }
}

// =============================================================================
// Assembler
// =============================================================================

/// Wrap rendered paragraphs in `<w:body>`
pub fn assemble_body(paragraphs: &[String]) -> String {
    let mut body = String::with_capacity(paragraphs.iter().map(String::len).sum::<usize>() + 16);
    body.push_str("<w:body>");
    for p in paragraphs {
        body.push_str(p);
    }
    body.push_str("</w:body>");
    body
}

/// Wrap a body in the `<w:document>` envelope declaring the `w` and `m` namespaces
pub fn assemble_document(body: &str) -> String {
    format!(
        "{}<w:document xmlns:w=\"{}\" xmlns:m=\"{}\">{}</w:document>",
        XML_DECLARATION, W_NAMESPACE, M_NAMESPACE, body
    )
}

// =============================================================================
// Public API Functions
// =============================================================================

/// Classify and render every block of `source`
pub fn classify_document(source: &str, options: &DocxOptions) -> Vec<String> {
    DocxConverter::with_options(options.clone()).classify(source).0
}

/// Convert LaTeX source to a `<w:body>` element
///
/// # Example
///
/// ```rust
/// use texdocx::core::latex2docx::latex_to_docx_body;
///
/// let body = latex_to_docx_body("Hello");
/// assert!(body.starts_with("<w:body>"));
/// ```
pub fn latex_to_docx_body(source: &str) -> String {
    DocxConverter::new().convert_body(source)
}

/// Convert LaTeX source to the full `word/document.xml` part
pub fn latex_to_document_xml(source: &str) -> String {
    DocxConverter::new().convert_document(source)
}

/// Convert LaTeX source to the document part, collecting warnings
pub fn latex_to_docx_with_diagnostics(source: &str, options: &DocxOptions) -> ConversionOutput {
    DocxConverter::with_options(options.clone()).convert_with_diagnostics(source)
}

// =============================================================================
// Tests
// =============================================================================
