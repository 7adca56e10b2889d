//! vf-exec - Variable resolution for Varflow
//!
//! This crate runs the build order computed by `vf-core`: each group of
//! variables is resolved concurrently through a [`QueryClient`], and the values
//! obtained are substituted into the parameters of the following groups.

pub mod capture;
pub mod client;
pub mod error;
pub mod executor;

pub use capture::capture_values;
pub use client::{QueryClient, QueryRequest};
pub use error::{ExecError, ExecResult, QueryError, QueryResult};
pub use executor::{ExecutionReport, WaveExecutor};
