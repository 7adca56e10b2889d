//! vf-core - Core library for Varflow
//!
//! This crate provides the dashboard variable model, the extraction of `$name`
//! references, the dependency graph between variables, its build order grouped
//! in waves, and the incremental passes (shaking, resume point) that limit a
//! recomputation to the variables affected by a selection change.

pub mod config;
pub mod error;
pub mod feed;
pub mod graph;
pub mod order;
pub mod reference;
pub mod resume;
pub mod selection;
mod shake;
pub mod variable;
pub mod variable_name;

pub use config::FeedConfig;
pub use error::{CoreError, CoreResult};
pub use feed::{is_valid_duration, QueryTarget, VariableFeedRequest, VariableFeedResponse};
pub use graph::{build_variable_dependencies, Dependencies, VariableGraph};
pub use order::{build_order, build_order_with_selection, Group};
pub use reference::{find_references, referenced_variables, substitute};
pub use resume::{calculation_start_at, ResumePoint};
pub use selection::{Selection, SelectionState};
pub use variable::{
    ConstantParameter, ExpressionParameter, LabelNamesParameter, LabelValuesParameter, Variable,
    VariableParameter, VariableSet,
};
pub use variable_name::VariableName;
