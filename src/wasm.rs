//! WASM bindings for texdocx
//!
//! This module provides JavaScript-accessible functions for LaTeX → DOCX conversion.
//! `latexToDocxBytes` returns the archive as a `Uint8Array`; offering it as a
//! download is left to the page.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "wasm")]
use crate::DocxOptions;

/// Conversion options (exposed to WASM)
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct DocxConvertOptions {
    /// Keep blocks starting with unknown commands as plain paragraphs
    #[serde(default)]
    pub keep_unknown: bool,
    /// Strip `%` comments before conversion
    #[serde(default = "default_true")]
    pub strip_comments: bool,
    /// Bullet run text for itemize entries
    #[serde(default)]
    pub bullet: Option<String>,
    /// Prefix of figure captions
    #[serde(default)]
    pub caption_prefix: Option<String>,
}

#[cfg(feature = "wasm")]
impl Default for DocxConvertOptions {
    fn default() -> Self {
        Self {
            keep_unknown: false,
            strip_comments: true,
            bullet: None,
            caption_prefix: None,
        }
    }
}

#[cfg(feature = "wasm")]
impl From<DocxConvertOptions> for DocxOptions {
    fn from(opts: DocxConvertOptions) -> Self {
        let defaults = DocxOptions::default();
        DocxOptions {
            drop_unrecognized: !opts.keep_unknown,
            strip_comments: opts.strip_comments,
            bullet: opts.bullet.unwrap_or(defaults.bullet),
            caption_prefix: opts.caption_prefix.unwrap_or(defaults.caption_prefix),
            default_caption: defaults.default_caption,
        }
    }
}

#[cfg(feature = "wasm")]
fn default_true() -> bool {
    true
}

/// Conversion result with additional metadata
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct ConvertResult {
    /// The `word/document.xml` content
    pub output: String,
    /// Whether the conversion was successful
    pub success: bool,
    /// Error message if conversion failed
    pub error: Option<String>,
    /// Warnings during conversion, as "[kind] line N: message"
    pub warnings: Vec<String>,
}

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Convert LaTeX source to the `<w:body>` element
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "latexToDocxBody")]
pub fn latex_to_docx_body_wasm(input: &str) -> String {
    crate::latex_to_docx_body(input)
}

/// Convert LaTeX source to the full `word/document.xml` part
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "latexToDocumentXml")]
pub fn latex_to_document_xml_wasm(input: &str) -> String {
    crate::latex_to_document_xml(input)
}

/// Render one math expression (no delimiters) as OMML
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "renderMath")]
pub fn render_math_wasm(input: &str) -> String {
    crate::render_math(input)
}

/// Convert LaTeX to the document part with options and warnings
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "latexToDocxWithOptions")]
pub fn latex_to_docx_with_options_wasm(input: &str, options: JsValue) -> JsValue {
    let opts: DocxConvertOptions = serde_wasm_bindgen::from_value(options).unwrap_or_default();
    let docx_opts = DocxOptions::from(opts);

    let result = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        crate::latex_to_docx_with_diagnostics(input, &docx_opts)
    })) {
        Ok(output) => ConvertResult {
            output: output.content,
            success: true,
            error: None,
            warnings: output.warnings.iter().map(describe_warning).collect(),
        },
        Err(e) => {
            let error_msg = if let Some(s) = e.downcast_ref::<&str>() {
                format!("Conversion failed: {}", s)
            } else if let Some(s) = e.downcast_ref::<String>() {
                format!("Conversion failed: {}", s)
            } else {
                "Conversion failed: unknown error (check browser console for details)".to_string()
            };
            ConvertResult {
                output: String::new(),
                success: false,
                error: Some(error_msg),
                warnings: vec![],
            }
        }
    };

    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// Convert LaTeX source to a complete `.docx` archive
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "latexToDocxBytes")]
pub fn latex_to_docx_bytes_wasm(input: &str, options: JsValue) -> Result<Vec<u8>, JsValue> {
    let opts: DocxConvertOptions = serde_wasm_bindgen::from_value(options).unwrap_or_default();
    crate::latex_to_docx_bytes_with_options(input, &DocxOptions::from(opts))
        .map(|(bytes, _)| bytes)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// File name to offer for the downloaded archive
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "defaultOutputName")]
pub fn default_output_name() -> String {
    crate::constants::DEFAULT_OUTPUT_NAME.to_string()
}

/// Get version information
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Check LaTeX for potential issues
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "checkLatex")]
pub fn check_latex_wasm(input: &str) -> JsValue {
    use crate::diagnostics::DiagnosticLevel;

    let result = crate::diagnostics::check_latex(input);

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut infos = Vec::new();

    for d in &result.diagnostics {
        let message = match d.line {
            Some(line) => format!("line {}: {}", line, d.message),
            None => d.message.clone(),
        };
        match d.level {
            DiagnosticLevel::Error => errors.push(message),
            DiagnosticLevel::Warning => warnings.push(message),
            DiagnosticLevel::Info => infos.push(message),
        }
    }

    let summary = CheckSummary {
        errors,
        warnings,
        infos,
        has_errors: result.has_errors(),
    };
    serde_wasm_bindgen::to_value(&summary).unwrap_or(JsValue::NULL)
}

/// Summary of LaTeX check results
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct CheckSummary {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub infos: Vec<String>,
    pub has_errors: bool,
}

#[cfg(feature = "wasm")]
fn describe_warning(warning: &crate::ConversionWarning) -> String {
    match warning.line {
        Some(line) => format!("[{}] line {}: {}", warning.kind, line, warning.message),
        None => format!("[{}] {}", warning.kind, warning.message),
    }
}
