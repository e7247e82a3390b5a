//! Edge case tests: degenerate inputs must not panic and must keep
//! "invalid input" apart from "valid but empty".

use dm_analyzer::{analyze, AnalyzeError, Category, Counts, Metadata, Rule};

fn invalid(bytes: &[u8]) -> String {
    match analyze(bytes) {
        Err(AnalyzeError::InvalidXml(msg)) => msg,
        other => panic!("expected InvalidXml, got {:?}", other),
    }
}

#[test]
fn empty_input_is_invalid() {
    invalid(b"");
}

#[test]
fn whitespace_only_is_invalid() {
    invalid(b"   \n\t ");
}

#[test]
fn plain_text_is_invalid() {
    invalid(b"hello world");
}

#[test]
fn json_is_invalid() {
    invalid(br#"{"dmodule": {}}"#);
}

#[test]
fn truncated_document_is_invalid() {
    invalid(b"<dmodule><content><procedure>");
}

#[test]
fn invalid_message_is_not_empty() {
    let msg = invalid(b"<dmodule></content>");
    assert!(!msg.is_empty());
}

#[test]
fn declaration_only_is_invalid() {
    invalid(br#"<?xml version="1.0"?>"#);
}

#[test]
fn invalid_utf8_name_is_invalid() {
    invalid(b"<dm\xff/>");
}

#[test]
fn minimal_root_only() {
    let r = analyze(b"<x/>").unwrap();
    assert_eq!(r.category, Category::Unknown);
    assert_eq!(r.counts, Counts::default());
    assert_eq!(r.metadata, Metadata::default());
    assert_eq!(r.quality_flags.len(), 1);
    assert_eq!(r.quality_flags[0].rule, Rule::MissingTitle);
}

#[test]
fn doctype_with_internal_subset_is_accepted() {
    let xml = br#"<?xml version="1.0"?>
<!DOCTYPE dmodule [
  <!NOTATION cgm PUBLIC "-//USA-DOD//NOTATION Computer Graphics Metafile//EN">
]>
<dmodule><dmTitle>Wheel</dmTitle><description/></dmodule>"#;
    let r = analyze(xml).unwrap();
    assert_eq!(r.category, Category::Description);
    assert!(r.quality_flags.is_empty());
}

#[test]
fn bom_prefixed_document_is_accepted() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"<dmodule><procedure/></dmodule>");
    let r = analyze(&bytes).unwrap();
    assert_eq!(r.category, Category::Procedure);
}

#[test]
fn deeply_nested_steps_are_counted() {
    let depth = 200;
    let xml = format!(
        "<dmodule><procedure>{}{}</procedure></dmodule>",
        "<proceduralStep>".repeat(depth),
        "</proceduralStep>".repeat(depth)
    );
    let r = analyze(xml.as_bytes()).unwrap();
    assert_eq!(r.counts.steps, depth);
    assert!(r.has_flag(Rule::OversizedProcedure));
}

#[test]
fn pathological_nesting_is_invalid_not_a_crash() {
    let depth = 200_000;
    let xml = format!(
        "<dmodule>{}{}</dmodule>",
        "<para>".repeat(depth),
        "</para>".repeat(depth)
    );
    let reason = invalid(xml.as_bytes());
    assert!(reason.contains("excessive depth"), "got: {}", reason);
}

#[test]
fn nesting_just_past_limit_is_invalid() {
    let depth = dm_analyzer::parser::MAX_DEPTH;
    let xml = format!(
        "<dmodule>{}{}</dmodule>",
        "<proceduralStep>".repeat(depth),
        "</proceduralStep>".repeat(depth)
    );
    invalid(xml.as_bytes());
}

#[test]
fn internal_subset_entity_in_title_is_expanded() {
    let xml = r#"<?xml version="1.0"?>
<!DOCTYPE dmodule [
  <!ENTITY bike "Bicycle">
]>
<dmodule>
  <identAndStatusSection><dmAddress><dmAddressItems>
    <dmTitle><techName>&bike; wheel</techName></dmTitle>
  </dmAddressItems></dmAddress></identAndStatusSection>
  <content><description/></content>
</dmodule>"#;
    let r = analyze(xml.as_bytes()).unwrap();
    assert_eq!(r.category, Category::Description);
    assert_eq!(r.metadata.dm_title.as_deref(), Some("Bicycle wheel"));
    assert!(r.quality_flags.is_empty());
}

#[test]
fn latin1_declared_document_is_decoded() {
    let xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<dmodule><dmTitle>Roue avant d\xE9pose</dmTitle><procedure><proceduralStep/></procedure></dmodule>";
    let r = analyze(xml).unwrap();
    assert_eq!(r.metadata.dm_title.as_deref(), Some("Roue avant dépose"));
    assert_eq!(r.category, Category::Procedure);
    assert_eq!(r.counts.steps, 1);
}

#[test]
fn title_in_cdata_is_read() {
    let r = analyze(b"<dmodule><dmTitle><![CDATA[  Brake\n   system ]]></dmTitle></dmodule>").unwrap();
    assert_eq!(r.metadata.dm_title.as_deref(), Some("Brake system"));
    assert!(!r.has_flag(Rule::MissingTitle));
}

#[test]
fn whitespace_title_counts_as_missing() {
    let r = analyze(b"<dmodule><dmTitle> \n </dmTitle></dmodule>").unwrap();
    assert_eq!(r.metadata.dm_title, None);
    assert!(r.has_flag(Rule::MissingTitle));
}

#[test]
fn prefixed_s1000d_elements_do_not_match_unqualified_context() {
    // No default namespace: only unqualified elements count
    let xml = br#"<dmodule xmlns:s="urn:s1000d"><s:procedure/><s:proceduralStep/></dmodule>"#;
    let r = analyze(xml).unwrap();
    assert_eq!(r.category, Category::Unknown);
    assert_eq!(r.counts.steps, 0);
}

#[test]
fn unqualified_child_undeclaring_default_is_not_counted() {
    let xml = br#"<dmodule xmlns="urn:s1000d"><procedure/><x xmlns=""><proceduralStep/></x></dmodule>"#;
    let r = analyze(xml).unwrap();
    assert_eq!(r.category, Category::Procedure);
    assert_eq!(r.counts.steps, 0);
    assert!(r.has_flag(Rule::EmptyProcedure));
}
