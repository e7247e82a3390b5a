//! Config schema and deserialization

use crate::analyzer::rules::MAX_STEPS;
use crate::Severity;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Rule severity override (error, warning, info, off)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Error,
    Warning,
    Info,
    /// Disable the rule entirely
    Off,
}

impl RuleSeverity {
    /// Convert to crate::Severity if not Off
    pub fn to_severity(self) -> Option<Severity> {
        match self {
            RuleSeverity::Error => Some(Severity::Error),
            RuleSeverity::Warning => Some(Severity::Warning),
            RuleSeverity::Info => Some(Severity::Info),
            RuleSeverity::Off => None,
        }
    }
}

/// Per-path override configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverride {
    /// Glob patterns this override applies to
    pub files: Vec<String>,

    /// Optional step threshold for matched files
    #[serde(default)]
    pub max_steps: Option<usize>,

    /// Optional rule overrides for matched files
    #[serde(default)]
    pub rules: HashMap<String, RuleSeverity>,
}

/// Root config structure for .dmrc.json
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default)]
    pub extends: Option<String>,

    /// Step count above which oversized-procedure fires. Default: 20
    #[serde(default)]
    pub max_steps: Option<usize>,

    /// Exit 1 when any flag reaches this severity
    #[serde(default)]
    pub fail_on: Option<Severity>,

    /// Per-rule severity overrides. Key is rule name in kebab-case.
    #[serde(default)]
    pub rules: HashMap<String, RuleSeverity>,

    /// Glob patterns for files/directories to exclude from analysis
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Per-path configuration overrides
    #[serde(default)]
    pub overrides: Vec<ConfigOverride>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, max_steps: Option<usize>, fail_on: Option<Severity>) -> Self {
        if max_steps.is_some() {
            self.max_steps = max_steps;
        }
        if fail_on.is_some() {
            self.fail_on = fail_on;
        }
        self
    }

    /// Step threshold in force when no override applies
    pub fn max_steps(&self) -> usize {
        self.max_steps.unwrap_or(MAX_STEPS)
    }

    /// Get the severity override for a rule, if any
    pub fn rule_severity(&self, rule_id: &str) -> Option<RuleSeverity> {
        self.rules.get(rule_id).copied()
    }

    /// Config for the whole run, with no per-path overrides applied
    pub fn effective(&self) -> EffectiveConfig {
        EffectiveConfig {
            max_steps: self.max_steps(),
            rules: self.rules.clone(),
        }
    }

    /// Get effective config for a specific file path, applying overrides in order
    pub fn effective_for_file(&self, file_path: &Path) -> EffectiveConfig {
        let mut effective = self.effective();

        for override_cfg in &self.overrides {
            if Self::matches_override(file_path, &override_cfg.files) {
                if let Some(max_steps) = override_cfg.max_steps {
                    effective.max_steps = max_steps;
                }
                for (rule, severity) in &override_cfg.rules {
                    effective.rules.insert(rule.clone(), *severity);
                }
            }
        }

        effective
    }

    /// Check if a file path matches any of the override patterns
    fn matches_override(file_path: &Path, patterns: &[String]) -> bool {
        patterns.iter().any(|pattern| match globset::Glob::new(pattern) {
            Ok(glob) => glob.compile_matcher().is_match(file_path),
            Err(e) => {
                tracing::warn!("Ignoring invalid override pattern {}: {}", pattern, e);
                false
            }
        })
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.max_steps.is_none() {
            self.max_steps = base.max_steps;
        }
        if self.fail_on.is_none() {
            self.fail_on = base.fail_on;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }

        for (rule, severity) in base.rules {
            self.rules.entry(rule).or_insert(severity);
        }

        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;

        // Prepend base overrides so this config's overrides apply last
        let mut all_overrides = base.overrides;
        all_overrides.append(&mut self.overrides);
        self.overrides = all_overrides;
    }
}

/// Effective configuration for a specific file (after applying overrides)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub max_steps: usize,
    pub rules: HashMap<String, RuleSeverity>,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            max_steps: MAX_STEPS,
            rules: HashMap::new(),
        }
    }
}
