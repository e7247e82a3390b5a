//! JSON reporter for machine-readable output

use super::FileReport;
use crate::analyzer::engine::AggregateStats;
use crate::AnalysisResult;
use serde::Serialize;
use std::collections::BTreeMap;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn to_json<T: Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        let out = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        out.unwrap_or_else(|_| fallback.to_string())
    }

    /// Result for one file, with a `file` field alongside the result fields
    pub fn report_file(&self, report: &FileReport) -> String {
        self.to_json(&JsonFile::from(report), "{}")
    }

    /// Report with summary
    pub fn report_with_summary(&self, reports: &[FileReport], stats: &AggregateStats) -> String {
        let output = JsonOutput {
            results: reports.iter().map(JsonFile::from).collect(),
            summary: JsonSummary {
                files_analyzed: stats.files_analyzed,
                total_flags: stats.total_flags,
                total_steps: stats.total_steps,
                by_category: stats
                    .by_category
                    .iter()
                    .map(|(c, n)| (c.as_str(), *n))
                    .collect(),
            },
        };
        self.to_json(&output, "{}")
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonFile<'a> {
    file: String,
    #[serde(flatten)]
    result: &'a AnalysisResult,
}

impl<'a> From<&'a FileReport> for JsonFile<'a> {
    fn from(report: &'a FileReport) -> Self {
        Self {
            file: report.path.display().to_string(),
            result: &report.result,
        }
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    results: Vec<JsonFile<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    files_analyzed: usize,
    total_flags: usize,
    total_steps: usize,
    by_category: BTreeMap<&'static str, usize>,
}
