use cvd_agent::inference::{FeatureRecord, InferenceError};

use crate::support::passthrough_pipeline;

#[test]
fn given_array_document_when_parsing_record_then_first_element_is_used() {
    let record = FeatureRecord::from_json_str(r#"[{"a": 1.5, "b": null}, {"a": 9.0}]"#)
        .expect("array document should parse");

    assert_eq!(record.value("a"), Some(1.5));
    assert!(record.contains_key("b"));
    assert_eq!(record.value("b"), None);
}

#[test]
fn given_empty_array_when_parsing_record_then_parse_fails() {
    assert!(FeatureRecord::from_json_str("[]").is_err());
}

#[test]
fn given_null_versus_absent_key_when_running_inference_then_only_absent_key_is_missing() {
    let pipeline = passthrough_pipeline(&["a", "b", "c"], 0.0);
    let record = FeatureRecord::from_json_str(r#"{"a": 0.2, "b": null}"#).expect("record");

    let err = pipeline
        .run_inference(record)
        .expect_err("absent key must fail validation");

    match err {
        InferenceError::MissingFeatures(missing) => assert_eq!(missing.features, vec!["c"]),
        other => panic!("unexpected error: {other:?}"),
    }
}
