//! Core conversion modules
//!
//! This module contains the conversion engine:
//! - `latex2docx`: LaTeX to WordprocessingML / OMML converter

pub mod latex2docx;

// Re-export main types and functions from latex2docx
pub use latex2docx::{
    assemble_body, assemble_document, classify_document, latex_to_document_xml,
    latex_to_docx_body, latex_to_docx_with_diagnostics, process_inline, render_math,
    ConversionState, DocxConverter, DocxOptions,
};
