//! Misplaced safety content: warnings/cautions outside a procedure.

use super::QualityRule;
use crate::{Category, DocumentFacts, QualityFlag, Rule};

/// Rule for safety messages in a data module that is not a procedure
pub struct MisplacedSafetyRule;

impl MisplacedSafetyRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MisplacedSafetyRule {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityRule for MisplacedSafetyRule {
    fn rule(&self) -> Rule {
        Rule::MisplacedSafety
    }

    fn evaluate(&self, facts: &DocumentFacts) -> Option<QualityFlag> {
        if facts.counts.safety_messages() > 0 && facts.category != Category::Procedure {
            return Some(self.flag(
                "Safety messages found but DM is not a procedure (check structure/placement)"
                    .to_string(),
            ));
        }
        None
    }
}
