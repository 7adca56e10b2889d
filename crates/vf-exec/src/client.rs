//! Query client trait definition

use crate::error::QueryResult;
use async_trait::async_trait;
use vf_core::{QueryTarget, VariableName, VariableParameter};

/// Everything a query client needs to compute one variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// Variable being computed
    pub variable: VariableName,

    /// Parameter with the known `$name` references already replaced by their values
    pub parameter: VariableParameter,

    /// Datasource and time range to query
    pub target: QueryTarget,
}

/// Backend able to run the query of a variable
///
/// Implementations must be Send + Sync: one call is issued per variable of a
/// group, all running at the same time.
#[async_trait]
pub trait QueryClient: Send + Sync {
    /// Run the query and return the raw values, before any capturing regexp
    async fn query(&self, request: &QueryRequest) -> QueryResult<Vec<String>>;

    /// Client type identifier for logging
    fn client_type(&self) -> &'static str;
}
