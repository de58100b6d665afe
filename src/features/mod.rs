//! Feature modules - Output surfaces around the conversion core
//!
//! - Figures (`\includegraphics` path and `\caption` extraction)
//! - DOCX packaging (zip archive with manifests and styles)

pub mod figures;
pub mod package;

// Re-export commonly used types
pub use figures::Figure;
pub use package::{latex_to_docx_bytes, latex_to_docx_bytes_with_options, DocxPackage};
