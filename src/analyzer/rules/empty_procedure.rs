//! Empty procedure: procedure container without any steps.

use super::QualityRule;
use crate::{Category, DocumentFacts, QualityFlag, Rule};

/// Rule for procedural data modules that hold no `proceduralStep`
pub struct EmptyProcedureRule;

impl EmptyProcedureRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EmptyProcedureRule {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityRule for EmptyProcedureRule {
    fn rule(&self) -> Rule {
        Rule::EmptyProcedure
    }

    fn evaluate(&self, facts: &DocumentFacts) -> Option<QualityFlag> {
        if facts.category == Category::Procedure && facts.counts.steps == 0 {
            return Some(self.flag(
                "Procedure found but no proceduralStep elements".to_string(),
            ));
        }
        None
    }
}
