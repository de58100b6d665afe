//! DOCX packaging
//!
//! Writes the four parts of a minimal WordprocessingML package into a zip
//! archive held in memory:
//! - `[Content_Types].xml`
//! - `_rels/.rels`
//! - `word/styles.xml`
//! - `word/document.xml`

use std::io::{Cursor, Seek, Write};

use zip::write::{SimpleFileOptions, ZipWriter};

use crate::core::latex2docx::{DocxConverter, DocxOptions};
use crate::data::constants::{parts, CONTENT_TYPES_XML, ROOT_RELS_XML, STYLES_XML};
use crate::utils::error::{ConversionError, ConversionResult, ConversionWarning};

/// Builder for `.docx` archives
///
/// # Examples
///
/// ```
/// use texdocx::features::package::DocxPackage;
///
/// let mut package = DocxPackage::new();
/// package.add_document("<?xml version=\"1.0\"?><w:document/>").unwrap();
/// let bytes = package.finish_to_bytes().unwrap();
/// assert!(bytes.starts_with(b"PK"));
/// ```
pub struct DocxPackage<W: Write + Seek> {
    zip_writer: ZipWriter<W>,
    has_document: bool,
}

impl DocxPackage<Cursor<Vec<u8>>> {
    /// Create a package that writes to memory
    pub fn new() -> Self {
        Self::with_writer(Cursor::new(Vec::new()))
    }

    /// Finish the archive and return its bytes
    pub fn finish_to_bytes(self) -> ConversionResult<Vec<u8>> {
        Ok(self.finish()?.into_inner())
    }
}

impl Default for DocxPackage<Cursor<Vec<u8>>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Seek> DocxPackage<W> {
    /// Create a package over a custom writer
    pub fn with_writer(writer: W) -> Self {
        Self {
            zip_writer: ZipWriter::new(writer),
            has_document: false,
        }
    }

    /// Add one part to the archive, deflated
    pub fn add_part(&mut self, name: &str, content: &[u8]) -> ConversionResult<()> {
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        self.zip_writer.start_file(name, options)?;
        self.zip_writer.write_all(content)?;
        Ok(())
    }

    /// Add the manifests, the style sheet and the main document part
    pub fn add_document(&mut self, document_xml: &str) -> ConversionResult<()> {
        self.add_part(parts::CONTENT_TYPES, CONTENT_TYPES_XML.as_bytes())?;
        self.add_part(parts::ROOT_RELS, ROOT_RELS_XML.as_bytes())?;
        self.add_part(parts::STYLES, STYLES_XML.as_bytes())?;
        self.add_part(parts::DOCUMENT, document_xml.as_bytes())?;
        self.has_document = true;
        Ok(())
    }

    /// Whether the main document part has been written
    pub fn has_document(&self) -> bool {
        self.has_document
    }

    /// Finish writing and return the underlying writer.
    ///
    /// Fails when no main document part was added.
    pub fn finish(self) -> ConversionResult<W> {
        if !self.has_document {
            return Err(ConversionError::package(format!(
                "archive has no {} part",
                parts::DOCUMENT
            )));
        }
        Ok(self.zip_writer.finish()?)
    }
}

/// Convert LaTeX source into a complete `.docx` archive
pub fn latex_to_docx_bytes(source: &str) -> ConversionResult<Vec<u8>> {
    latex_to_docx_bytes_with_options(source, &DocxOptions::default()).map(|(bytes, _)| bytes)
}

/// Convert LaTeX source into a `.docx` archive, returning conversion warnings too
pub fn latex_to_docx_bytes_with_options(
    source: &str,
    options: &DocxOptions,
) -> ConversionResult<(Vec<u8>, Vec<ConversionWarning>)> {
    let output = DocxConverter::with_options(options.clone()).convert_with_diagnostics(source);
    let mut package = DocxPackage::new();
    package.add_document(&output.content)?;
    Ok((package.finish_to_bytes()?, output.warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_archive_has_four_parts() {
        let bytes = latex_to_docx_bytes(r"\section{Intro}").unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "word/document.xml",
                "word/styles.xml"
            ]
        );
    }

    #[test]
    fn test_document_part_content() {
        let bytes = latex_to_docx_bytes("Hello $x^2$").unwrap();
        let doc = read_part(&bytes, "word/document.xml");
        assert!(doc.contains("<w:document"));
        assert!(doc.contains("<m:sSup>"));
        let rels = read_part(&bytes, "_rels/.rels");
        assert!(rels.contains("Target=\"word/document.xml\""));
    }

    #[test]
    fn test_styles_part_defines_list_bullet() {
        let bytes = latex_to_docx_bytes("x").unwrap();
        assert!(read_part(&bytes, "word/styles.xml").contains("w:styleId=\"ListBullet\""));
    }

    #[test]
    fn test_warnings_returned_with_bytes() {
        let (bytes, warnings) =
            latex_to_docx_bytes_with_options(r"\maketitle", &DocxOptions::default()).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_package_tracks_document() {
        let mut package = DocxPackage::new();
        assert!(!package.has_document());
        package.add_document("<w:document/>").unwrap();
        assert!(package.has_document());
    }

    #[test]
    fn test_finish_without_document_fails() {
        let err = DocxPackage::new().finish_to_bytes().unwrap_err();
        assert!(matches!(err, ConversionError::PackageError { .. }));
        assert!(err.to_string().contains("word/document.xml"));
    }
}
