//! Mixed intent: procedural steps inside a parts data module.

use super::QualityRule;
use crate::{Category, DocumentFacts, QualityFlag, Rule};

/// Rule for parts data modules that also carry procedural steps
pub struct MixedIntentRule;

impl MixedIntentRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MixedIntentRule {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityRule for MixedIntentRule {
    fn rule(&self) -> Rule {
        Rule::MixedIntent
    }

    fn evaluate(&self, facts: &DocumentFacts) -> Option<QualityFlag> {
        if facts.category == Category::Parts && facts.counts.steps > 0 {
            return Some(self.flag(
                "proceduralStep found inside parts DM (mixed intent)".to_string(),
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::rules::test_support::clean_facts;

    #[test]
    fn test_fires_on_parts_with_steps() {
        let mut facts = clean_facts();
        facts.category = Category::Parts;
        facts.counts.steps = 3;
        let flag = MixedIntentRule::new().evaluate(&facts).unwrap();
        assert_eq!(flag.message, "proceduralStep found inside parts DM (mixed intent)");
    }

    #[test]
    fn test_silent_on_parts_without_steps() {
        let mut facts = clean_facts();
        facts.category = Category::Parts;
        assert!(MixedIntentRule::new().evaluate(&facts).is_none());
    }

    #[test]
    fn test_silent_on_procedure_with_steps() {
        let mut facts = clean_facts();
        facts.category = Category::Procedure;
        facts.counts.steps = 3;
        assert!(MixedIntentRule::new().evaluate(&facts).is_none());
    }
}
