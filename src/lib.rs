//! dm-analyzer: structural classifier and quality checker for S1000D data modules
//!
//! This library inspects one data module XML document and reports what kind of
//! data module it is, how many steps and safety/advisory elements it holds, and
//! which quality rules it trips.

pub mod analyzer;
pub mod config;
pub mod detector;
pub mod error;
pub mod parser;
pub mod reporter;

pub use analyzer::AnalysisEngine;
pub use error::AnalyzeError;

use serde::{Deserialize, Serialize, Serializer};

/// Analyze raw document bytes with the default rule set and step threshold
pub fn analyze(bytes: &[u8]) -> Result<AnalysisResult, AnalyzeError> {
    AnalysisEngine::new().analyze_bytes(bytes)
}

/// The main result of analyzing a data module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// Detected data module kind
    pub category: Category,
    /// Identifying metadata, when present
    pub metadata: Metadata,
    /// Structural element counts
    pub counts: Counts,
    /// Triggered quality rules, in rule evaluation order
    pub quality_flags: Vec<QualityFlag>,
}

impl AnalysisResult {
    /// Messages of the triggered flags, in order
    pub fn flag_messages(&self) -> Vec<&str> {
        self.quality_flags.iter().map(|f| f.message.as_str()).collect()
    }

    /// True if a flag for the given rule was raised
    pub fn has_flag(&self, rule: Rule) -> bool {
        self.quality_flags.iter().any(|f| f.rule == rule)
    }

    /// Highest severity among the raised flags
    pub fn max_severity(&self) -> Option<Severity> {
        self.quality_flags.iter().map(|f| f.severity).max()
    }
}

/// Data module kind, inferred from its top-level structural container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Parts,
    Fault,
    Procedure,
    Description,
    Unknown,
}

impl Category {
    /// Every category, in classification priority order
    pub const ALL: [Category; 5] = [
        Category::Parts,
        Category::Fault,
        Category::Procedure,
        Category::Description,
        Category::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Parts => "parts",
            Category::Fault => "fault",
            Category::Procedure => "procedure",
            Category::Description => "description",
            Category::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifying metadata pulled from the identification section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub dm_code: Option<String>,
    pub dm_title: Option<String>,
}

/// Element counts over the whole document tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    /// `proceduralStep` elements
    pub steps: usize,
    /// `warning` elements
    pub warnings: usize,
    /// `caution` elements
    pub cautions: usize,
    /// `note` elements
    pub notes: usize,
}

impl Counts {
    /// Warnings plus cautions
    pub fn safety_messages(&self) -> usize {
        self.warnings + self.cautions
    }
}

/// Everything extracted from a document; the only input quality rules see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFacts {
    pub category: Category,
    pub counts: Counts,
    pub metadata: Metadata,
}

/// A triggered quality rule.
///
/// Serializes as its message alone, so `quality_flags` is a plain list of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityFlag {
    /// Rule that raised this flag
    pub rule: Rule,
    /// Severity of the flag (rule default or config override)
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
}

impl Serialize for QualityFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.message)
    }
}

/// Severity levels for flags, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Quality rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// Procedure container with no steps
    EmptyProcedure,
    /// Too many steps for one data module
    OversizedProcedure,
    /// Warnings or cautions outside a procedural data module
    MisplacedSafety,
    /// Steps inside a parts data module
    MixedIntent,
    /// No `dmTitle` element
    MissingTitle,
}

impl Rule {
    /// Severity used when no config override applies
    pub fn default_severity(self) -> Severity {
        match self {
            Rule::EmptyProcedure | Rule::MixedIntent => Severity::Error,
            Rule::OversizedProcedure | Rule::MisplacedSafety => Severity::Warning,
            Rule::MissingTitle => Severity::Info,
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::EmptyProcedure => write!(f, "empty-procedure"),
            Rule::OversizedProcedure => write!(f, "oversized-procedure"),
            Rule::MisplacedSafety => write!(f, "misplaced-safety"),
            Rule::MixedIntent => write!(f, "mixed-intent"),
            Rule::MissingTitle => write!(f, "missing-title"),
        }
    }
}
