//! Dashboard variable definitions

use crate::reference::substitute;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// All variables of one dashboard, keyed by their (not yet validated) name.
///
/// Names are validated when the dependency graph is built, so a malformed name
/// surfaces as a [`CoreError::InvalidVariableName`](crate::CoreError::InvalidVariableName)
/// instead of a deserialization failure.
pub type VariableSet = BTreeMap<String, Variable>;

/// A single dashboard template variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// How the variable values are produced
    pub parameter: VariableParameter,

    /// Value previously selected for this variable, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
}

impl Variable {
    /// Create a variable without a selected value
    pub fn new(parameter: VariableParameter) -> Self {
        Self {
            parameter,
            selected: None,
        }
    }

    /// Set the previously selected value
    pub fn with_selected(mut self, selected: impl Into<String>) -> Self {
        self.selected = Some(selected.into());
        self
    }
}

/// The kind-specific parameter of a variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VariableParameter {
    /// Fixed list of values
    Constant(ConstantParameter),
    /// Values computed by a query expression
    Expression(ExpressionParameter),
    /// Values are the label names matching a set of series matchers
    LabelNames(LabelNamesParameter),
    /// Values are the values of one label across a set of series matchers
    LabelValues(LabelValuesParameter),
}

/// Parameter of a constant variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantParameter {
    pub values: Vec<String>,
}

/// Parameter of an expression query variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionParameter {
    pub expr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capturing_regexp: Option<String>,
}

/// Parameter of a label-names query variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelNamesParameter {
    #[serde(default)]
    pub matchers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capturing_regexp: Option<String>,
}

/// Parameter of a label-values query variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelValuesParameter {
    pub label_name: String,
    #[serde(default)]
    pub matchers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capturing_regexp: Option<String>,
}

impl VariableParameter {
    /// Build a constant parameter from a list of values
    pub fn constant<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        VariableParameter::Constant(ConstantParameter {
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    /// Build an expression parameter without capturing regexp
    pub fn expression(expr: impl Into<String>) -> Self {
        VariableParameter::Expression(ExpressionParameter {
            expr: expr.into(),
            capturing_regexp: None,
        })
    }

    /// Short kind identifier, matching the serialized `kind` tag
    pub fn kind(&self) -> &'static str {
        match self {
            VariableParameter::Constant(_) => "constant",
            VariableParameter::Expression(_) => "expression",
            VariableParameter::LabelNames(_) => "label_names",
            VariableParameter::LabelValues(_) => "label_values",
        }
    }

    /// Whether the values come from the query collaborator
    pub fn is_query(&self) -> bool {
        !matches!(self, VariableParameter::Constant(_))
    }

    /// The capturing regexp applied to query results, if any
    pub fn capturing_regexp(&self) -> Option<&str> {
        match self {
            VariableParameter::Constant(_) => None,
            VariableParameter::Expression(p) => p.capturing_regexp.as_deref(),
            VariableParameter::LabelNames(p) => p.capturing_regexp.as_deref(),
            VariableParameter::LabelValues(p) => p.capturing_regexp.as_deref(),
        }
    }

    /// Every text field that may embed `$name` references.
    ///
    /// Constants have none: their literal values are never scanned.
    pub fn texts(&self) -> Vec<&str> {
        match self {
            VariableParameter::Constant(_) => Vec::new(),
            VariableParameter::Expression(p) => vec![p.expr.as_str()],
            VariableParameter::LabelNames(p) => p.matchers.iter().map(String::as_str).collect(),
            VariableParameter::LabelValues(p) => std::iter::once(p.label_name.as_str())
                .chain(p.matchers.iter().map(String::as_str))
                .collect(),
        }
    }

    /// Return a copy with every known `$name` reference replaced by its value
    pub fn substitute(&self, selection: &HashMap<String, String>) -> Self {
        match self {
            VariableParameter::Constant(p) => VariableParameter::Constant(p.clone()),
            VariableParameter::Expression(p) => VariableParameter::Expression(ExpressionParameter {
                expr: substitute(&p.expr, selection),
                capturing_regexp: p.capturing_regexp.clone(),
            }),
            VariableParameter::LabelNames(p) => VariableParameter::LabelNames(LabelNamesParameter {
                matchers: p.matchers.iter().map(|m| substitute(m, selection)).collect(),
                capturing_regexp: p.capturing_regexp.clone(),
            }),
            VariableParameter::LabelValues(p) => {
                VariableParameter::LabelValues(LabelValuesParameter {
                    label_name: substitute(&p.label_name, selection),
                    matchers: p.matchers.iter().map(|m| substitute(m, selection)).collect(),
                    capturing_regexp: p.capturing_regexp.clone(),
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "variable_test.rs"]
mod tests;
