//! Error types for vf-exec

use thiserror::Error;
use vf_core::CoreError;

/// Failure to compute the values of one variable
#[derive(Error, Debug)]
pub enum QueryError {
    /// Q001: The query client reported an error
    #[error("[Q001] Query failed for variable '{variable}': {message}")]
    Failed { variable: String, message: String },

    /// Q002: The query client does not handle this kind of parameter
    #[error("[Q002] Parameter of kind '{kind}' is not managed by the {client} client")]
    Unsupported { kind: String, client: String },

    /// Q003: Capturing regexp does not compile
    #[error("[Q003] Invalid capturing regexp '{pattern}': {message}")]
    InvalidCapturingRegexp { pattern: String, message: String },

    /// Q004: The evaluation task panicked or was cancelled
    #[error("[Q004] Evaluation of variable '{variable}' did not complete: {message}")]
    TaskJoin { variable: String, message: String },
}

/// Result type alias for QueryError
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that prevent a feed from running at all
#[derive(Error, Debug)]
pub enum ExecError {
    /// Malformed request or dashboard definition
    #[error(transparent)]
    Core(#[from] CoreError),

    /// E001: The build order names a variable missing from the variable set
    #[error("[E001] Variable '{name}' is in the build order but not defined")]
    UnknownVariable { name: String },

    /// E002: Waves run without a target while no default datasource is configured
    #[error("[E002] No default_datasource configured to run the variables on")]
    NoDefaultTarget,
}

impl ExecError {
    /// Whether the caller sent something invalid, as opposed to a server-side failure
    pub fn is_client_error(&self) -> bool {
        match self {
            ExecError::Core(e) => e.is_client_error(),
            ExecError::UnknownVariable { .. } => true,
            ExecError::NoDefaultTarget => false,
        }
    }
}

/// Result type alias for ExecError
pub type ExecResult<T> = Result<T, ExecError>;
