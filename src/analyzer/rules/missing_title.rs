//! Missing title: no dmTitle in the identification metadata.

use super::QualityRule;
use crate::{DocumentFacts, QualityFlag, Rule};

/// Rule for data modules without a usable `dmTitle`
pub struct MissingTitleRule;

impl MissingTitleRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MissingTitleRule {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityRule for MissingTitleRule {
    fn rule(&self) -> Rule {
        Rule::MissingTitle
    }

    fn evaluate(&self, facts: &DocumentFacts) -> Option<QualityFlag> {
        if facts.metadata.dm_title.is_none() {
            return Some(self.flag("dmTitle not found (metadata missing in sample)".to_string()));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::rules::test_support::clean_facts;

    #[test]
    fn test_fires_without_title() {
        let mut facts = clean_facts();
        facts.metadata.dm_title = None;
        assert!(MissingTitleRule::new().evaluate(&facts).is_some());
    }

    #[test]
    fn test_dm_code_does_not_substitute_for_title() {
        let mut facts = clean_facts();
        facts.metadata.dm_title = None;
        facts.metadata.dm_code = Some("DMC-BIKE".to_string());
        assert!(MissingTitleRule::new().evaluate(&facts).is_some());
    }

    #[test]
    fn test_silent_with_title() {
        assert!(MissingTitleRule::new().evaluate(&clean_facts()).is_none());
    }
}
