use super::*;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_no_pattern_keeps_values() {
    let values = strings(&["b", "a", "b"]);
    assert_eq!(capture_values(values.clone(), None).unwrap(), values);
}

#[test]
fn test_capture_whole_value() {
    let values = strings(&["node", "api", "node"]);
    assert_eq!(capture_values(values, Some("(.*)")).unwrap(), strings(&["node", "api"]));
}

#[test]
fn test_capture_drops_non_matching_values() {
    let values = strings(&["host-1:9100", "host-2:9100", "localhost"]);
    assert_eq!(
        capture_values(values, Some(r"(.*):\d+")).unwrap(),
        strings(&["host-1", "host-2"])
    );
}

#[test]
fn test_capture_collects_every_group() {
    let values = strings(&["eu-west/prod", "us-east/prod"]);
    assert_eq!(
        capture_values(values, Some("(.*)/(.*)")).unwrap(),
        strings(&["eu-west", "prod", "us-east"])
    );
}

#[test]
fn test_optional_group_that_did_not_participate_is_skipped() {
    let values = strings(&["a", "a-b"]);
    assert_eq!(
        capture_values(values, Some("^(a)(?:-(b))?$")).unwrap(),
        strings(&["a", "b"])
    );
}

#[test]
fn test_invalid_pattern() {
    let err = capture_values(strings(&["x"]), Some("(unclosed")).unwrap_err();
    assert!(matches!(err, QueryError::InvalidCapturingRegexp { .. }));
}
