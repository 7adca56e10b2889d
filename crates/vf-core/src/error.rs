//! Error types for vf-core

use thiserror::Error;

/// Core error type for Varflow
#[derive(Error, Debug)]
pub enum CoreError {
    /// V001: Variable name does not match the naming rule
    #[error("[V001] '{name}' is not a correct variable name. It should match the regexp: {pattern}")]
    InvalidVariableName { name: String, pattern: String },

    /// V002: Variable referenced but never defined
    #[error("[V002] Variable '{name}' is used in the variable '{used_by}' but not defined")]
    UndefinedVariable { name: String, used_by: String },

    /// V003: Circular dependency detected
    #[error("[V003] circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// V004: Malformed feed request
    #[error("[V004] Invalid feed request: {message}")]
    InvalidFeedRequest { message: String },

    /// V005: Capturing regexp does not compile
    #[error("[V005] Invalid capturing regexp for variable '{name}': {message}")]
    InvalidCapturingRegexp { name: String, message: String },

    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Invalid configuration value
    #[error("[C002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C003: IO error with file path context
    #[error("[C003] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// YAML parse error
    #[error("YAML error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Whether the error comes from a malformed dashboard definition or request.
    ///
    /// The API layer maps these to a bad request rather than a server error.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidVariableName { .. }
                | CoreError::UndefinedVariable { .. }
                | CoreError::CircularDependency { .. }
                | CoreError::InvalidFeedRequest { .. }
                | CoreError::InvalidCapturingRegexp { .. }
                | CoreError::Json(_)
        )
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
