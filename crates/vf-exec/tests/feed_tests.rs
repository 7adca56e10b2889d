//! End-to-end feed scenarios, from a JSON request body to the responses

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use vf_core::{CoreError, FeedConfig, VariableFeedRequest, VariableParameter};
use vf_exec::{ExecError, QueryClient, QueryError, QueryRequest, QueryResult, WaveExecutor};

/// Answers queries from a table keyed on the substituted query text
struct TableClient {
    table: HashMap<String, Vec<String>>,
    queried: Mutex<Vec<String>>,
}

impl TableClient {
    fn new(rows: &[(&str, &[&str])]) -> Self {
        Self {
            table: rows
                .iter()
                .map(|(key, values)| {
                    (
                        key.to_string(),
                        values.iter().map(|v| v.to_string()).collect(),
                    )
                })
                .collect(),
            queried: Mutex::new(Vec::new()),
        }
    }

    fn queried(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryClient for TableClient {
    async fn query(&self, request: &QueryRequest) -> QueryResult<Vec<String>> {
        let key = match &request.parameter {
            VariableParameter::Expression(p) => p.expr.clone(),
            VariableParameter::LabelValues(p) => p.matchers.join(","),
            other => {
                return Err(QueryError::Unsupported {
                    kind: other.kind().to_string(),
                    client: self.client_type().to_string(),
                })
            }
        };
        self.queried.lock().unwrap().push(key.clone());
        self.table
            .get(&key)
            .cloned()
            .ok_or_else(|| QueryError::Failed {
                variable: request.variable.to_string(),
                message: format!("no series for {key}"),
            })
    }

    fn client_type(&self) -> &'static str {
        "table"
    }
}

fn kubernetes_client() -> Arc<TableClient> {
    Arc::new(TableClient::new(&[
        (r#"kube_pod_info{cluster="eu"}"#, &["default", "monitoring"]),
        (r#"kube_pod_info{cluster="us"}"#, &["prod"]),
        (
            r#"kube_pod_info{cluster="eu",namespace="default"}"#,
            &[r#"kube_pod_info{pod="api-1"}"#, r#"kube_pod_info{pod="api-2"}"#],
        ),
        (
            r#"kube_pod_info{cluster="us",namespace="prod"}"#,
            &[r#"kube_pod_info{pod="web-1"}"#],
        ),
    ]))
}

const KUBERNETES_VARIABLES: &str = r#"{
    "cluster": {"parameter": {"kind": "constant", "values": ["eu", "us"]}},
    "namespace": {"parameter": {
        "kind": "label_values",
        "label_name": "namespace",
        "matchers": ["kube_pod_info{cluster=\"$cluster\"}"]
    }},
    "pod": {"parameter": {
        "kind": "expression",
        "expr": "kube_pod_info{cluster=\"$cluster\",namespace=\"$namespace\"}",
        "capturing_regexp": "pod=\"([^\"]+)\""
    }}
}"#;

fn request(extra: &str) -> VariableFeedRequest {
    let body = format!(
        r#"{{"datasource": "prometheus", "duration": "6h", "variables": {KUBERNETES_VARIABLES}{extra}}}"#
    );
    VariableFeedRequest::from_json(&body).unwrap()
}

async fn feed(
    client: &Arc<TableClient>,
    request: &VariableFeedRequest,
) -> vf_exec::ExecutionReport {
    let client: Arc<dyn QueryClient> = client.clone();
    WaveExecutor::new(client, &FeedConfig::default())
        .feed(request)
        .await
        .unwrap()
}

// ── Full computation ────────────────────────────────────────────────────

#[tokio::test]
async fn test_first_load_computes_every_variable() {
    let client = kubernetes_client();
    let report = feed(&client, &request("")).await;

    assert!(!report.aborted);
    assert_eq!(report.waves_run, 3);

    let body = serde_json::to_value(&report.results).unwrap();
    assert_eq!(
        body,
        serde_json::json!([
            {"name": "cluster", "selected": "eu", "values": ["eu", "us"]},
            {"name": "namespace", "selected": "default", "values": ["default", "monitoring"]},
            {"name": "pod", "selected": "api-1", "values": ["api-1", "api-2"]},
        ])
    );
}

// ── Incremental computation ─────────────────────────────────────────────

#[tokio::test]
async fn test_changing_the_root_recomputes_its_dependents() {
    let client = kubernetes_client();
    let request = request(
        r#", "selected_variables": {"cluster": "us", "namespace": "default", "pod": "api-1"},
            "previous_selected_variables": {"cluster": "eu", "namespace": "default", "pod": "api-1"}"#,
    );

    let report = feed(&client, &request).await;

    let names: Vec<&str> = report.results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["namespace", "pod"]);
    assert_eq!(report.waves_run, 2);

    // pod sees the namespace computed in this feed, not the stale selection
    assert_eq!(
        client.queried(),
        vec![
            r#"kube_pod_info{cluster="us"}"#.to_string(),
            r#"kube_pod_info{cluster="us",namespace="prod"}"#.to_string(),
        ]
    );
    assert_eq!(report.results[1].selected.as_deref(), Some("web-1"));
}

#[tokio::test]
async fn test_changing_a_leaf_computes_nothing() {
    let client = kubernetes_client();
    let request = request(
        r#", "selected_variables": {"cluster": "eu", "namespace": "default", "pod": "api-2"},
            "previous_selected_variables": {"cluster": "eu", "namespace": "default", "pod": "api-1"}"#,
    );

    let report = feed(&client, &request).await;

    assert!(report.results.is_empty());
    assert_eq!(report.waves_run, 0);
    assert!(client.queried().is_empty());
}

// ── Failures ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_unsupported_kind_stops_after_its_group() {
    let client = Arc::new(TableClient::new(&[("up", &["1"])]));
    let request = VariableFeedRequest::from_json(
        r#"{
            "datasource": "prometheus",
            "variables": {
                "label": {"parameter": {"kind": "label_names", "matchers": ["up"]}},
                "up": {"parameter": {"kind": "expression", "expr": "up"}},
                "value": {"parameter": {"kind": "expression", "expr": "sum by ($label) (up)"}}
            }
        }"#,
    )
    .unwrap();

    let report = feed(&client, &request).await;

    assert!(report.aborted);
    assert_eq!(report.waves_run, 1);
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].name, "label");
    assert!(failures[0].err.as_deref().unwrap().starts_with("[Q002]"));
    assert_eq!(client.queried(), vec!["up".to_string()]);
}

#[tokio::test]
async fn test_selection_without_previous_is_rejected() {
    let client = kubernetes_client();
    let body = format!(
        r#"{{"datasource": "prometheus", "variables": {KUBERNETES_VARIABLES}, "selected_variables": {{"cluster": "us"}}}}"#
    );
    let request: VariableFeedRequest = serde_json::from_str(&body).unwrap();

    let dyn_client: Arc<dyn QueryClient> = client.clone();
    let err = WaveExecutor::new(dyn_client, &FeedConfig::default())
        .feed(&request)
        .await
        .unwrap_err();

    assert!(matches!(err, ExecError::Core(CoreError::InvalidFeedRequest { .. })));
    assert!(client.queried().is_empty());
}

#[tokio::test]
async fn test_undefined_reference_is_rejected() {
    let client = kubernetes_client();
    let request = VariableFeedRequest::from_json(
        r#"{
            "datasource": "prometheus",
            "variables": {"pod": {"parameter": {"kind": "expression", "expr": "up{namespace=\"$namespace\"}"}}}
        }"#,
    )
    .unwrap();

    let dyn_client: Arc<dyn QueryClient> = client.clone();
    let err = WaveExecutor::new(dyn_client, &FeedConfig::default())
        .feed(&request)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "[V002] Variable 'namespace' is used in the variable 'pod' but not defined"
    );
}
