//! Integration tests: full analysis pipeline against the fixture data modules in test-data/

use dm_analyzer::analyzer::AnalysisEngine;
use dm_analyzer::{AnalysisResult, AnalyzeError, Category, Counts, Rule};
use std::path::Path;

const PROCEDURE: &str = "test-data/DMC-S1000DBIKE-AAA-DA1-00-00-00AA-520A-A_procedure.xml";
const PARTS: &str = "test-data/DMC-S1000DBIKE-AAA-DA1-00-00-00AA-941A-A_parts.xml";
const FAULT: &str = "test-data/DMC-S1000DBIKE-AAA-DA1-00-00-00AA-421A-A_fault.xml";
const DESCRIPTION: &str = "test-data/DMC-S1000DBIKE-AAA-DA1-00-00-00AA-041A-A_description.xml";

fn analyze(path: &str) -> AnalysisResult {
    AnalysisEngine::new()
        .analyze_file(Path::new(path))
        .unwrap_or_else(|e| panic!("analyze({}) failed: {}", path, e))
}

fn rules(result: &AnalysisResult) -> Vec<Rule> {
    result.quality_flags.iter().map(|f| f.rule).collect()
}

#[test]
fn clean_procedure_has_no_flags() {
    let r = analyze(PROCEDURE);
    assert_eq!(r.category, Category::Procedure);
    assert_eq!(
        r.counts,
        Counts {
            steps: 3,
            warnings: 1,
            cautions: 1,
            notes: 1
        }
    );
    assert_eq!(
        r.metadata.dm_title.as_deref(),
        Some("Front wheel Remove procedure")
    );
    assert!(r.quality_flags.is_empty(), "got {:?}", r.flag_messages());
}

#[test]
fn attribute_only_dm_code_is_absent() {
    let r = analyze(PROCEDURE);
    assert_eq!(r.metadata.dm_code, None);
}

#[test]
fn parts_with_steps_is_mixed_intent() {
    let r = analyze(PARTS);
    assert_eq!(r.category, Category::Parts);
    assert_eq!(r.counts.steps, 3);
    assert_eq!(rules(&r), vec![Rule::MixedIntent]);
}

#[test]
fn namespaced_fault_isolation_flags_misplaced_warning() {
    let r = analyze(FAULT);
    assert_eq!(r.category, Category::Fault);
    assert_eq!(r.counts.warnings, 1);
    assert_eq!(r.metadata.dm_title.as_deref(), Some("Brake system Fault isolation"));
    assert_eq!(rules(&r), vec![Rule::MisplacedSafety]);
}

#[test]
fn description_is_clean() {
    let r = analyze(DESCRIPTION);
    assert_eq!(r.category, Category::Description);
    assert_eq!(r.counts.notes, 1);
    assert!(r.quality_flags.is_empty());
}

#[test]
fn oversized_namespaced_procedure() {
    let r = analyze("test-data/oversized_namespaced.xml");
    assert_eq!(r.category, Category::Procedure);
    assert_eq!(
        r.counts,
        Counts {
            steps: 25,
            warnings: 1,
            cautions: 0,
            notes: 0
        }
    );
    assert_eq!(
        r.metadata.dm_code.as_deref(),
        Some("S1000DBIKE-AAA-DA1-00-00-00AA-720A-A")
    );
    assert_eq!(
        r.flag_messages(),
        vec![
            "Procedure has more than 20 steps (consider splitting)",
            "dmTitle not found (metadata missing in sample)",
        ]
    );
}

#[test]
fn empty_procedure_keeps_category() {
    let r = analyze("test-data/empty_procedure.xml");
    assert_eq!(r.category, Category::Procedure);
    assert_eq!(r.counts.steps, 0);
    assert_eq!(rules(&r), vec![Rule::EmptyProcedure]);
}

#[test]
fn no_markers_is_unknown_with_missing_title() {
    let r = analyze("test-data/no_markers.xml");
    assert_eq!(r.category, Category::Unknown);
    assert_eq!(r.counts, Counts::default());
    assert_eq!(rules(&r), vec![Rule::MissingTitle]);
}

#[test]
fn malformed_file_is_invalid_input() {
    let err = AnalysisEngine::new()
        .analyze_file(Path::new("test-data/malformed.xml"))
        .unwrap_err();
    assert!(err.is_invalid_input(), "got {:?}", err);
    assert!(matches!(err, AnalyzeError::InvalidXml(_)));
}

#[test]
fn json_wire_shape_for_fixture() {
    let r = analyze("test-data/oversized_namespaced.xml");
    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "category": "procedure",
            "metadata": {
                "dmCode": "S1000DBIKE-AAA-DA1-00-00-00AA-720A-A",
                "dmTitle": null
            },
            "counts": { "steps": 25, "warnings": 1, "cautions": 0, "notes": 0 },
            "quality_flags": [
                "Procedure has more than 20 steps (consider splitting)",
                "dmTitle not found (metadata missing in sample)"
            ]
        })
    );
}

#[test]
fn analyze_file_matches_analyze_bytes() {
    let bytes = std::fs::read(FAULT).unwrap();
    let from_bytes = dm_analyzer::analyze(&bytes).unwrap();
    assert_eq!(from_bytes, analyze(FAULT));
}
