//! # texdocx
//!
//! LaTeX → Office Open XML (WordprocessingML) converter written in Rust.
//!
//! ## Features
//!
//! - **Single pass**: segment, classify and render blocks in document order
//! - **Structured math**: inline and display math rendered as OMML trees
//! - **Headings, lists, figures**: `\chapter`..`\subsubsection`, `itemize` / `enumerate`, figure placeholders
//! - **Packaging**: writes a complete `.docx` archive with manifests and styles
//! - **Diagnostics**: static check of LaTeX input before conversion
//! - **WASM Support**: Compiles to WebAssembly for browser usage
//!
//! ## Usage Examples
//!
//! ### Math Rendering
//!
//! ```rust
//! use texdocx::render_math;
//!
//! let omml = render_math(r"\frac{1}{2}");
//! assert!(omml.starts_with("<m:oMath><m:f>"));
//! ```
//!
//! ### Full Document Conversion
//!
//! ```rust
//! use texdocx::{latex_to_docx_body, latex_to_docx_bytes};
//!
//! let body = latex_to_docx_body("\\section{Intro}\n\nValue is $x_i$.");
//! assert!(body.contains("Heading2"));
//!
//! let bytes = latex_to_docx_bytes(r"\section{Intro}").unwrap();
//! assert!(bytes.starts_with(b"PK"));
//! ```

/// Core conversion modules
pub mod core;

/// Data layer - static mappings and constants
pub mod data;

/// Feature modules - figures and packaging
pub mod features;

/// Utility modules
pub mod utils;

/// WASM bindings (feature-gated)
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export core conversion functions
pub use core::latex2docx;
pub use core::latex2docx::{
    assemble_body, assemble_document, classify_document, latex_to_document_xml,
    latex_to_docx_body, latex_to_docx_with_diagnostics, process_inline, render_math, BlockKind,
    ConversionState, DocxConverter, DocxOptions, MathNode,
};

// Re-export data modules
pub use data::constants;
pub use data::symbols;
pub use data::symbols::substitute_symbols;

// Re-export feature modules
pub use features::figures;
pub use features::package;
pub use features::package::{latex_to_docx_bytes, latex_to_docx_bytes_with_options, DocxPackage};

// Re-export utilities
pub use utils::diagnostics;
pub use utils::diagnostics::{check_latex, CheckResult};
pub use utils::error::{
    ConversionError, ConversionOutput, ConversionResult, ConversionWarning, WarningKind,
};

/// Convert LaTeX source and write the `.docx` archive to `path`
#[cfg(not(target_arch = "wasm32"))]
pub fn write_docx_file(
    source: &str,
    path: impl AsRef<std::path::Path>,
    options: &DocxOptions,
) -> ConversionResult<Vec<ConversionWarning>> {
    let (bytes, warnings) = latex_to_docx_bytes_with_options(source, options)?;
    std::fs::write(path, bytes)?;
    Ok(warnings)
}
