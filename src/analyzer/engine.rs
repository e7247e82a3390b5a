//! Analysis engine - parse, extract, classify, then run every rule

use crate::config::{Config, EffectiveConfig, RuleSeverity};
use crate::detector::CategoryDetector;
use crate::error::AnalyzeError;
use crate::parser::XmlDocument;
use crate::{AnalysisResult, Category, DocumentFacts, QualityFlag, Severity};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use super::extractor::Extractor;
use super::rules::{default_rules, QualityRule, MAX_STEPS};

/// Main analysis engine.
///
/// Holds only immutable configuration, so one engine can serve any number of
/// analyses, concurrently or not.
pub struct AnalysisEngine {
    /// Configuration the engine was built from (None = built-in defaults)
    config: Option<Config>,
}

impl AnalysisEngine {
    /// Create an engine with the built-in rules and thresholds
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Create an engine that applies a loaded config
    pub fn with_config(config: Config) -> Self {
        let known: Vec<String> = default_rules(MAX_STEPS).iter().map(|r| r.name()).collect();
        for rule_id in config
            .rules
            .keys()
            .chain(config.overrides.iter().flat_map(|o| o.rules.keys()))
        {
            if !known.contains(rule_id) {
                warn!("Unknown rule '{}' in config is ignored", rule_id);
            }
        }
        Self {
            config: Some(config),
        }
    }

    pub fn config(&self) -> Option<&Config> {
        self.config.as_ref()
    }

    fn effective(&self, path: Option<&Path>) -> EffectiveConfig {
        match (&self.config, path) {
            (Some(config), Some(path)) => config.effective_for_file(path),
            (Some(config), None) => config.effective(),
            (None, _) => EffectiveConfig::default(),
        }
    }

    /// Analyze raw document bytes.
    ///
    /// Malformed XML fails with [`AnalyzeError::InvalidXml`] before any
    /// extraction happens.
    pub fn analyze_bytes(&self, bytes: &[u8]) -> Result<AnalysisResult, AnalyzeError> {
        self.analyze_with(bytes, &self.effective(None))
    }

    /// Read and analyze a file, applying any per-path config overrides
    pub fn analyze_file(&self, path: &Path) -> Result<AnalysisResult, AnalyzeError> {
        let bytes = fs::read(path).map_err(|e| AnalyzeError::io(path, e))?;
        debug!("Analyzing {} ({} bytes)", path.display(), bytes.len());
        self.analyze_with(&bytes, &self.effective(Some(path)))
    }

    fn analyze_with(
        &self,
        bytes: &[u8],
        effective: &EffectiveConfig,
    ) -> Result<AnalysisResult, AnalyzeError> {
        let doc = XmlDocument::parse(bytes)?;
        let facts = extract_facts(&doc);
        let rules = default_rules(effective.max_steps);
        let quality_flags = apply_config_to_flags(evaluate_rules(&rules, &facts), effective);

        Ok(AnalysisResult {
            category: facts.category,
            metadata: facts.metadata,
            counts: facts.counts,
            quality_flags,
        })
    }

    /// Aggregate statistics over several results
    pub fn aggregate_stats(results: &[AnalysisResult]) -> AggregateStats {
        let by_category = Category::ALL
            .iter()
            .map(|&category| {
                let n = results.iter().filter(|r| r.category == category).count();
                (category, n)
            })
            .collect();

        AggregateStats {
            files_analyzed: results.len(),
            total_flags: results.iter().map(|r| r.quality_flags.len()).sum(),
            total_steps: results.iter().map(|r| r.counts.steps).sum(),
            by_category,
        }
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract counts, metadata and category under one namespace context
pub fn extract_facts(doc: &XmlDocument) -> DocumentFacts {
    let extractor = Extractor::new(doc);
    let category = CategoryDetector::new(&extractor).detect();
    let facts = DocumentFacts {
        category,
        counts: extractor.counts(),
        metadata: extractor.metadata(),
    };
    debug!(
        namespace = extractor.namespace().uri().unwrap_or("<none>"),
        %category,
        steps = facts.counts.steps,
        warnings = facts.counts.warnings,
        cautions = facts.counts.cautions,
        notes = facts.counts.notes,
        "extracted facts"
    );
    facts
}

/// Run every rule, in order, without short-circuiting
pub fn evaluate_rules(rules: &[Box<dyn QualityRule>], facts: &DocumentFacts) -> Vec<QualityFlag> {
    rules
        .iter()
        .filter_map(|rule| {
            let flag = rule.evaluate(facts);
            debug!(rule = %rule.name(), fired = flag.is_some(), "evaluated rule");
            flag
        })
        .collect()
}

/// Drop flags whose rule is off and apply severity overrides
fn apply_config_to_flags(flags: Vec<QualityFlag>, effective: &EffectiveConfig) -> Vec<QualityFlag> {
    flags
        .into_iter()
        .filter_map(|mut flag| match effective.rules.get(&flag.rule.to_string()) {
            Some(RuleSeverity::Off) => None,
            Some(rs) => {
                if let Some(sev) = rs.to_severity() {
                    flag.severity = sev;
                }
                Some(flag)
            }
            None => Some(flag),
        })
        .collect()
}

/// True when any flag in any result is at or above `level`
pub fn exceeds(results: &[AnalysisResult], level: Severity) -> bool {
    results
        .iter()
        .filter_map(AnalysisResult::max_severity)
        .any(|sev| sev >= level)
}

/// Aggregate statistics across multiple files
#[derive(Debug, Clone)]
pub struct AggregateStats {
    pub files_analyzed: usize,
    pub total_flags: usize,
    pub total_steps: usize,
    /// Result count per category, in priority order
    pub by_category: Vec<(Category, usize)>,
}

impl AggregateStats {
    pub fn count_for(&self, category: Category) -> usize {
        self.by_category
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}
