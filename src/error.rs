//! Error types for document analysis

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that stop an analysis before any facts are extracted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeError {
    /// Input is not well-formed XML
    #[error("Invalid XML: {0}")]
    InvalidXml(String),

    /// Input file could not be read
    #[error("Failed to read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}

impl AnalyzeError {
    pub fn io(path: &Path, err: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    /// True when the failure is caused by the document itself (client error)
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidXml(_))
    }
}

impl From<quick_xml::Error> for AnalyzeError {
    fn from(err: quick_xml::Error) -> Self {
        Self::InvalidXml(err.to_string())
    }
}
