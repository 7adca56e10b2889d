//! Group-by-group resolution of dashboard variables
//!
//! Groups run strictly in order. Inside a group every query variable gets its
//! own task, and all of them are awaited before the next group starts, since
//! the next group's parameters embed the values resolved here. The selection
//! map is only updated between groups.

use crate::capture::capture_values;
use crate::client::{QueryClient, QueryRequest};
use crate::error::{ExecError, ExecResult, QueryError};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use vf_core::{
    build_order, build_order_with_selection, ConstantParameter, FeedConfig, Group, QueryTarget,
    Selection, Variable, VariableFeedRequest, VariableFeedResponse, VariableName,
    VariableParameter, VariableSet,
};

/// Outcome of a run over the build order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    /// One entry per computed variable, group after group
    pub results: Vec<VariableFeedResponse>,

    /// Number of groups that were started (and fully drained)
    pub waves_run: usize,

    /// Whether a failing variable stopped the run. Later groups, if any, were not started.
    pub aborted: bool,
}

impl ExecutionReport {
    /// Results that carry an error
    pub fn failures(&self) -> impl Iterator<Item = &VariableFeedResponse> {
        self.results.iter().filter(|r| r.is_error())
    }
}

/// Runs the build order against a query client
pub struct WaveExecutor {
    client: Arc<dyn QueryClient>,
    limiter: Option<Arc<Semaphore>>,
    default_target: Option<QueryTarget>,
    default_duration: Option<String>,
}

impl std::fmt::Debug for WaveExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaveExecutor")
            .field("client", &self.client.client_type())
            .field("limited", &self.limiter.is_some())
            .field("default_target", &self.default_target)
            .finish()
    }
}

impl WaveExecutor {
    /// Create an executor; `config.max_concurrency` caps the queries in flight
    pub fn new(client: Arc<dyn QueryClient>, config: &FeedConfig) -> Self {
        Self {
            client,
            limiter: config
                .max_concurrency
                .map(|permits| Arc::new(Semaphore::new(permits))),
            default_target: config.target(),
            default_duration: config.default_duration.clone(),
        }
    }

    /// Validate a feed request, plan it and compute its variables.
    ///
    /// When the request carries selections, the variables whose value is
    /// known and unaffected are pruned from the plan first. Structural errors
    /// (bad name, undefined reference, cycle) return before any query runs.
    /// A request without duration uses the configured `default_duration`.
    pub async fn feed(&self, request: &VariableFeedRequest) -> ExecResult<ExecutionReport> {
        request.validate()?;
        let groups = if request.is_incremental() {
            build_order_with_selection(&request.variables, &request.selection_state())?
        } else {
            build_order(&request.variables)?
        };
        log::debug!(
            "Feeding {} of {} variable(s) on datasource '{}'",
            groups.iter().map(|g| g.variables.len()).sum::<usize>(),
            request.variables.len(),
            request.datasource
        );
        let mut target = request.target();
        if target.duration.is_none() {
            target.duration = self.default_duration.clone();
        }
        self.execute(
            &target,
            &request.variables,
            &groups,
            request.selected_variables.clone(),
        )
        .await
    }

    /// Compute the variables of `groups` on the configured default datasource
    pub async fn run(
        &self,
        variables: &VariableSet,
        groups: &[Group],
        selection: Selection,
    ) -> ExecResult<ExecutionReport> {
        let Some(target) = &self.default_target else {
            return Err(ExecError::NoDefaultTarget);
        };
        self.execute(target, variables, groups, selection).await
    }

    /// Compute the variables of `groups`, in order, starting from `selection`.
    ///
    /// The first group containing a failure is drained completely, then the run
    /// stops. Every result gathered so far is returned, failures included.
    /// A variable computed without a selected value (failure, no values) loses
    /// its entry in `selection`, so later groups never see its previous value.
    pub async fn execute(
        &self,
        target: &QueryTarget,
        variables: &VariableSet,
        groups: &[Group],
        mut selection: Selection,
    ) -> ExecResult<ExecutionReport> {
        for name in groups.iter().flat_map(|g| g.variables.iter()) {
            if !variables.contains_key(name.as_str()) {
                return Err(ExecError::UnknownVariable {
                    name: name.to_string(),
                });
            }
        }

        let mut report = ExecutionReport::default();
        for (index, group) in groups.iter().enumerate() {
            log::debug!(
                "Resolving group {}/{} with {} variable(s)",
                index + 1,
                groups.len(),
                group.variables.len()
            );

            let results = self.run_group(target, variables, group, &selection).await;
            report.waves_run += 1;

            let failed = results.iter().filter(|r| r.is_error()).count();
            for result in &results {
                match (&result.err, &result.selected) {
                    (None, Some(selected)) => {
                        selection.insert(result.name.clone(), selected.clone());
                    }
                    _ => {
                        selection.remove(&result.name);
                    }
                }
            }
            report.results.extend(results);

            if failed > 0 {
                report.aborted = true;
                log::warn!(
                    "{} variable(s) failed in group {}, skipping the {} remaining group(s)",
                    failed,
                    index + 1,
                    groups.len() - index - 1
                );
                break;
            }
        }
        Ok(report)
    }

    /// Start every variable of the group, then wait for all of them
    async fn run_group(
        &self,
        target: &QueryTarget,
        variables: &VariableSet,
        group: &Group,
        selection: &Selection,
    ) -> Vec<VariableFeedResponse> {
        let snapshot = Arc::new(selection.clone());
        let mut slots: Vec<Option<VariableFeedResponse>> = vec![None; group.variables.len()];
        let mut pending: Vec<(usize, VariableName, JoinHandle<VariableFeedResponse>)> = Vec::new();

        for (slot, name) in group.variables.iter().enumerate() {
            let variable = &variables[name.as_str()];
            match &variable.parameter {
                VariableParameter::Constant(param) => {
                    slots[slot] = Some(resolve_constant(name, param, variable, selection));
                }
                parameter => {
                    let handle = self.spawn_query(
                        name.clone(),
                        parameter.clone(),
                        target.clone(),
                        Arc::clone(&snapshot),
                    );
                    pending.push((slot, name.clone(), handle));
                }
            }
        }

        let joined = join_all(
            pending
                .into_iter()
                .map(|(slot, name, handle)| async move { (slot, name, handle.await) }),
        )
        .await;

        for (slot, name, outcome) in joined {
            let result = outcome.unwrap_or_else(|e| {
                let err = QueryError::TaskJoin {
                    variable: name.to_string(),
                    message: e.to_string(),
                };
                log::warn!("{}", err);
                VariableFeedResponse::failed(name.as_str(), err.to_string())
            });
            slots[slot] = Some(result);
        }

        slots.into_iter().flatten().collect()
    }

    fn spawn_query(
        &self,
        name: VariableName,
        parameter: VariableParameter,
        target: QueryTarget,
        snapshot: Arc<Selection>,
    ) -> JoinHandle<VariableFeedResponse> {
        let client = Arc::clone(&self.client);
        let limiter = self.limiter.clone();

        tokio::spawn(async move {
            let _permit = match limiter {
                Some(semaphore) => match semaphore.acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(_) => {
                        return VariableFeedResponse::failed(
                            name.as_str(),
                            "query limiter was closed",
                        )
                    }
                },
                None => None,
            };

            let request = QueryRequest {
                parameter: parameter.substitute(&snapshot),
                variable: name,
                target,
            };
            evaluate_query(client.as_ref(), &request).await
        })
    }
}

/// Constants need no query: the selected value is the known one, else the first literal
fn resolve_constant(
    name: &VariableName,
    param: &ConstantParameter,
    variable: &Variable,
    selection: &Selection,
) -> VariableFeedResponse {
    let selected = selection
        .get(name.as_str())
        .or(variable.selected.as_ref())
        .or(param.values.first())
        .cloned();
    VariableFeedResponse::resolved(name.as_str(), param.values.clone(), selected)
}

async fn evaluate_query(client: &dyn QueryClient, request: &QueryRequest) -> VariableFeedResponse {
    let started = Instant::now();
    let name = request.variable.as_str();

    let outcome = client
        .query(request)
        .await
        .and_then(|raw| capture_values(raw, request.parameter.capturing_regexp()));

    match outcome {
        Ok(values) => {
            log::debug!(
                "Variable '{}' resolved to {} value(s) by {} in {}ms",
                name,
                values.len(),
                client.client_type(),
                started.elapsed().as_millis()
            );
            let selected = values.first().cloned();
            VariableFeedResponse::resolved(name, values, selected)
        }
        Err(e) => {
            log::warn!("Variable '{}' could not be resolved: {}", name, e);
            VariableFeedResponse::failed(name, e.to_string())
        }
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
