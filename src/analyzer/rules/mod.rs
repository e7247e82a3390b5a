//! Quality rules for data modules
//!
//! Each rule is an independent predicate over [`DocumentFacts`]. Rules never see
//! the XML tree and never look at each other's output, so one can be added,
//! removed or disabled without changing what any other rule reports.

pub mod empty_procedure;
pub mod misplaced_safety;
pub mod missing_title;
pub mod mixed_intent;
pub mod oversized_procedure;

pub use empty_procedure::EmptyProcedureRule;
pub use misplaced_safety::MisplacedSafetyRule;
pub use missing_title::MissingTitleRule;
pub use mixed_intent::MixedIntentRule;
pub use oversized_procedure::{OversizedProcedureRule, MAX_STEPS};

use crate::{DocumentFacts, QualityFlag, Rule};

/// Trait for quality rules
pub trait QualityRule: Send + Sync {
    /// Which rule this is
    fn rule(&self) -> Rule;

    /// Evaluate against the extracted facts; Some when the rule fires
    fn evaluate(&self, facts: &DocumentFacts) -> Option<QualityFlag>;

    /// Kebab-case rule id, as used in config files
    fn name(&self) -> String {
        self.rule().to_string()
    }

    /// Build a flag for this rule at its default severity
    fn flag(&self, message: String) -> QualityFlag {
        let rule = self.rule();
        QualityFlag {
            rule,
            severity: rule.default_severity(),
            message,
        }
    }
}

/// The built-in rules in evaluation order
pub fn default_rules(max_steps: usize) -> Vec<Box<dyn QualityRule>> {
    vec![
        Box::new(EmptyProcedureRule::new()),
        Box::new(OversizedProcedureRule::new(max_steps)),
        Box::new(MisplacedSafetyRule::new()),
        Box::new(MixedIntentRule::new()),
        Box::new(MissingTitleRule::new()),
    ]
}
