//! Oversized procedure: too many steps for one data module.

use super::QualityRule;
use crate::{DocumentFacts, QualityFlag, Rule};

/// Step count above which a data module should be split
pub const MAX_STEPS: usize = 20;

/// Rule for data modules with more than `max_steps` procedural steps
pub struct OversizedProcedureRule {
    max_steps: usize,
}

impl OversizedProcedureRule {
    pub fn new(max_steps: usize) -> Self {
        Self { max_steps }
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }
}

impl Default for OversizedProcedureRule {
    fn default() -> Self {
        Self::new(MAX_STEPS)
    }
}

impl QualityRule for OversizedProcedureRule {
    fn rule(&self) -> Rule {
        Rule::OversizedProcedure
    }

    fn evaluate(&self, facts: &DocumentFacts) -> Option<QualityFlag> {
        if facts.counts.steps > self.max_steps {
            return Some(self.flag(format!(
                "Procedure has more than {} steps (consider splitting)",
                self.max_steps
            )));
        }
        None
    }
}
