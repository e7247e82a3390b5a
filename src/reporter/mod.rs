//! Reporter module for output formatting

pub mod console;
pub mod json;

pub use console::ConsoleReporter;
pub use json::JsonReporter;

use crate::AnalysisResult;
use std::path::PathBuf;

/// An analysis result together with the file it came from
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: AnalysisResult,
}
