use super::*;

const BODY: &str = r#"{
    "datasource": "prometheus",
    "duration": "1h",
    "variables": {
        "job": {"parameter": {"kind": "constant", "values": ["node", "api"]}},
        "instance": {
            "parameter": {
                "kind": "label_values",
                "label_name": "instance",
                "matchers": ["up{job='$job'}"],
                "capturing_regexp": "(.*):\\d+"
            }
        }
    }
}"#;

#[test]
fn test_parse_valid_request() {
    let request = VariableFeedRequest::from_json(BODY).unwrap();
    assert_eq!(request.datasource, "prometheus");
    assert_eq!(request.variables.len(), 2);
    assert!(!request.is_incremental());
    assert_eq!(
        request.target(),
        QueryTarget {
            datasource: "prometheus".to_string(),
            duration: Some("1h".to_string()),
        }
    );
}

#[test]
fn test_empty_datasource_rejected() {
    let body = r#"{"datasource": " ", "variables": {"a": {"parameter": {"kind": "constant", "values": []}}}}"#;
    let err = VariableFeedRequest::from_json(body).unwrap_err();
    assert!(matches!(err, CoreError::InvalidFeedRequest { .. }));
    assert!(err.to_string().contains("datasource cannot be empty"));
    assert!(err.is_client_error());
}

#[test]
fn test_empty_variables_rejected() {
    let body = r#"{"datasource": "prom", "variables": {}}"#;
    let err = VariableFeedRequest::from_json(body).unwrap_err();
    assert!(err.to_string().contains("variables cannot be empty"));
}

#[test]
fn test_selected_without_previous_rejected() {
    let body = r#"{
        "datasource": "prom",
        "variables": {"a": {"parameter": {"kind": "constant", "values": ["1"]}}},
        "selected_variables": {"a": "1"}
    }"#;
    let err = VariableFeedRequest::from_json(body).unwrap_err();
    assert!(err.to_string().contains("previous_selected_variables"));
}

#[test]
fn test_invalid_capturing_regexp_rejected() {
    let body = r#"{
        "datasource": "prom",
        "variables": {"a": {"parameter": {"kind": "expression", "expr": "up", "capturing_regexp": "(unclosed"}}}
    }"#;
    let err = VariableFeedRequest::from_json(body).unwrap_err();
    assert!(matches!(err, CoreError::InvalidCapturingRegexp { ref name, .. } if name == "a"));
}

#[test]
fn test_durations() {
    for ok in ["0", "30s", "5m", "6h", "1d12h", "2w", "1y", "1h30m15s500ms"] {
        assert!(is_valid_duration(ok), "{ok}");
    }
    for bad in ["", "banana", "6", "1.5h", "30m1h", "-1h", " 1h"] {
        assert!(!is_valid_duration(bad), "{bad}");
    }
}

#[test]
fn test_malformed_duration_rejected() {
    let body = r#"{
        "datasource": "prom",
        "duration": "banana",
        "variables": {"a": {"parameter": {"kind": "constant", "values": ["1"]}}}
    }"#;
    let err = VariableFeedRequest::from_json(body).unwrap_err();
    assert!(matches!(err, CoreError::InvalidFeedRequest { .. }));
    assert!(err.to_string().contains("'banana' is not a valid duration"));
    assert!(err.is_client_error());
}

#[test]
fn test_malformed_json_is_a_client_error() {
    let err = VariableFeedRequest::from_json("{").unwrap_err();
    assert!(matches!(err, CoreError::Json(_)));
    assert!(err.is_client_error());
}

#[test]
fn test_incremental_request_selection_state() {
    let body = r#"{
        "datasource": "prom",
        "variables": {"a": {"parameter": {"kind": "constant", "values": ["1", "2"]}}},
        "selected_variables": {"a": "2"},
        "previous_selected_variables": {"a": "1"}
    }"#;
    let request = VariableFeedRequest::from_json(body).unwrap();
    assert!(request.is_incremental());
    let state = request.selection_state();
    assert_eq!(state.current["a"], "2");
    assert_eq!(state.previous["a"], "1");
    assert!(state.diff().contains("a"));
}

#[test]
fn test_response_serialization_omits_empty_fields() {
    let ok = VariableFeedResponse::resolved("job", vec!["node".into()], Some("node".into()));
    assert_eq!(
        serde_json::to_value(&ok).unwrap(),
        serde_json::json!({"name": "job", "selected": "node", "values": ["node"]})
    );

    let failed = VariableFeedResponse::failed("instance", "timeout");
    assert!(failed.is_error());
    assert_eq!(
        serde_json::to_value(&failed).unwrap(),
        serde_json::json!({"name": "instance", "values": [], "err": "timeout"})
    );
}
