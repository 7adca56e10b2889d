//! Variable feed request and response exchanged with the dashboard UI

use crate::error::{CoreError, CoreResult};
use crate::selection::{Selection, SelectionState};
use crate::variable::VariableSet;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Accepted query durations: units from years down to milliseconds, largest first (`1h30m`)
pub const DURATION_PATTERN: &str =
    r"^(([0-9]+)y)?(([0-9]+)w)?(([0-9]+)d)?(([0-9]+)h)?(([0-9]+)m)?(([0-9]+)s)?(([0-9]+)ms)?$";

fn duration_regex() -> &'static Regex {
    static DURATION: OnceLock<Regex> = OnceLock::new();
    DURATION.get_or_init(|| Regex::new(DURATION_PATTERN).expect("valid regex literal"))
}

/// Check a query duration such as `6h` or `1d12h`. `0` is accepted, an empty string is not.
pub fn is_valid_duration(duration: &str) -> bool {
    duration == "0" || (!duration.is_empty() && duration_regex().is_match(duration))
}

/// Where variable queries are executed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTarget {
    /// Name of the datasource to query
    pub datasource: String,

    /// Time range of the queries (e.g. `1h`), passed as is to the query client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl QueryTarget {
    /// Target a datasource without an explicit duration
    pub fn new(datasource: impl Into<String>) -> Self {
        Self {
            datasource: datasource.into(),
            duration: None,
        }
    }
}

/// Request to compute the values of a dashboard's variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableFeedRequest {
    pub datasource: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    pub variables: VariableSet,

    /// Values currently selected by the user.
    ///
    /// Compared with `previous_selected_variables` to find which variables changed,
    /// so that only the affected ones are computed again.
    #[serde(default, skip_serializing_if = "Selection::is_empty")]
    pub selected_variables: Selection,

    /// Values selected before the user changed one of them
    #[serde(default, skip_serializing_if = "Selection::is_empty")]
    pub previous_selected_variables: Selection,
}

impl VariableFeedRequest {
    /// Parse and validate a request body
    pub fn from_json(body: &str) -> CoreResult<Self> {
        let request: VariableFeedRequest = serde_json::from_str(body)?;
        request.validate()?;
        Ok(request)
    }

    /// Check the request is usable before computing anything
    pub fn validate(&self) -> CoreResult<()> {
        if self.datasource.trim().is_empty() {
            return Err(CoreError::InvalidFeedRequest {
                message: "datasource cannot be empty".to_string(),
            });
        }
        if self.variables.is_empty() {
            return Err(CoreError::InvalidFeedRequest {
                message: "variables cannot be empty".to_string(),
            });
        }
        if !self.selected_variables.is_empty() && self.previous_selected_variables.is_empty() {
            return Err(CoreError::InvalidFeedRequest {
                message: "selected_variables cannot be used without setting the previous_selected_variables"
                    .to_string(),
            });
        }
        if let Some(duration) = &self.duration {
            if !is_valid_duration(duration) {
                return Err(CoreError::InvalidFeedRequest {
                    message: format!("'{}' is not a valid duration", duration),
                });
            }
        }
        for (name, variable) in &self.variables {
            if let Some(pattern) = variable.parameter.capturing_regexp() {
                Regex::new(pattern).map_err(|e| CoreError::InvalidCapturingRegexp {
                    name: name.clone(),
                    message: e.to_string(),
                })?;
            }
        }
        Ok(())
    }

    /// Whether the caller sent selections, i.e. only part of the variables must be computed
    pub fn is_incremental(&self) -> bool {
        !self.selected_variables.is_empty()
    }

    /// Current and previous selections of the request
    pub fn selection_state(&self) -> SelectionState {
        SelectionState::new(
            self.selected_variables.clone(),
            self.previous_selected_variables.clone(),
        )
    }

    /// Where the request queries must run
    pub fn target(&self) -> QueryTarget {
        QueryTarget {
            datasource: self.datasource.clone(),
            duration: self.duration.clone(),
        }
    }
}

/// Computed values of one variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableFeedResponse {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,

    #[serde(default)]
    pub values: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
}

impl VariableFeedResponse {
    /// Successful result; the selected value is taken by the caller
    pub fn resolved(
        name: impl Into<String>,
        values: Vec<String>,
        selected: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            selected,
            values,
            err: None,
        }
    }

    /// Failed result
    pub fn failed(name: impl Into<String>, err: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selected: None,
            values: Vec::new(),
            err: Some(err.into()),
        }
    }

    /// Whether the computation of this variable failed
    pub fn is_error(&self) -> bool {
        self.err.is_some()
    }
}

#[cfg(test)]
#[path = "feed_test.rs"]
mod tests;
