//! Error handling for texdocx conversions
//!
//! The conversion core never fails; it reports non-fatal problems as
//! [`ConversionWarning`]s. [`ConversionError`] covers the fallible outer
//! surfaces: packaging the archive and file I/O.

use std::fmt;

/// Conversion error type
#[derive(Debug, Clone)]
pub enum ConversionError {
    /// Building the zip archive failed
    PackageError { message: String },
    /// IO error (for file operations)
    IoError { message: String },
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::PackageError { message } => {
                write!(f, "Package error: {}", message)
            }
            ConversionError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConversionError {}

impl From<std::io::Error> for ConversionError {
    fn from(err: std::io::Error) -> Self {
        ConversionError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for ConversionError {
    fn from(err: zip::result::ZipError) -> Self {
        ConversionError::PackageError {
            message: err.to_string(),
        }
    }
}

/// Result type for fallible operations
pub type ConversionResult<T> = Result<T, ConversionError>;

// Convenience constructors for errors
impl ConversionError {
    pub fn package(message: impl Into<String>) -> Self {
        ConversionError::PackageError {
            message: message.into(),
        }
    }
}

/// Category of a non-fatal conversion problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A block starting with an unknown command was dropped
    DroppedBlock,
    /// A list environment was still open at end of input
    UnclosedList,
    /// `\end{itemize}` without a matching begin
    UnmatchedListEnd,
    /// `\ref{}` with no identifier
    EmptyReference,
    /// A command's braced argument was missing or unclosed
    MissingArgument,
    /// A display-math or figure environment was never closed
    UnclosedEnvironment,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WarningKind::DroppedBlock => "dropped-block",
            WarningKind::UnclosedList => "unclosed-list",
            WarningKind::UnmatchedListEnd => "unmatched-list-end",
            WarningKind::EmptyReference => "empty-reference",
            WarningKind::MissingArgument => "missing-argument",
            WarningKind::UnclosedEnvironment => "unclosed-environment",
        };
        f.write_str(name)
    }
}

/// Conversion warnings (non-fatal issues)
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionWarning {
    pub kind: WarningKind,
    pub message: String,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl ConversionWarning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
            suggestion: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(l) = self.line {
            write!(f, "Warning at line {}: {}", l, self.message)?;
        } else {
            write!(f, "Warning: {}", self.message)?;
        }
        if let Some(ref sug) = self.suggestion {
            write!(f, " ({})", sug)?;
        }
        Ok(())
    }
}

/// Conversion output with optional warnings
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// The converted content
    pub content: String,
    /// Any warnings generated during conversion
    pub warnings: Vec<ConversionWarning>,
}

impl ConversionOutput {
    pub fn new(content: String) -> Self {
        Self {
            content,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(content: String, warnings: Vec<ConversionWarning>) -> Self {
        Self { content, warnings }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_error_display() {
        let err = ConversionError::package("bad entry");
        assert!(err.to_string().contains("Package error"));
        assert!(err.to_string().contains("bad entry"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.tex");
        let err: ConversionError = io.into();
        assert!(err.to_string().starts_with("IO error"));
    }

    #[test]
    fn test_warning_display() {
        let warn = ConversionWarning::new(WarningKind::DroppedBlock, "dropped \\maketitle")
            .at_line(3)
            .with_suggestion("remove the command");
        let msg = warn.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains("remove the command"));
        assert_eq!(WarningKind::DroppedBlock.to_string(), "dropped-block");
    }

    #[test]
    fn test_conversion_output() {
        let output = ConversionOutput::new("hello".to_string());
        assert!(!output.has_warnings());

        let output_with_warn = ConversionOutput::with_warnings(
            "hello".to_string(),
            vec![ConversionWarning::new(WarningKind::UnclosedList, "test warning")],
        );
        assert!(output_with_warn.has_warnings());
    }
}
