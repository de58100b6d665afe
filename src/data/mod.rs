//! Data layer - Static mappings and constants
//!
//! This module contains all static data used for LaTeX → DOCX conversion:
//! - Symbol mappings for math mode
//! - Style identifiers, namespaces and package part templates

pub mod constants;
pub mod symbols;

// Re-export commonly used items
pub use constants::{
    DEFAULT_OUTPUT_NAME, M_NAMESPACE, STYLE_HEADING1, STYLE_HEADING2, STYLE_HEADING3,
    STYLE_LIST_BULLET, W_NAMESPACE,
};
pub use symbols::{
    function_name, lookup_symbol, substitute_symbols, FUNCTION_NAMES, GREEK_LETTERS, MATH_SYMBOLS,
};
