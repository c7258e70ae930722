//! Error types for the scylla adapter.

use scylla::transport::errors::{NewSessionError, QueryError};
use thiserror::Error;

/// Errors that can occur while talking to the cluster.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Failed to open a session to any of the seed nodes.
    #[error("failed to connect to cluster: {0}")]
    Connect(#[from] NewSessionError),

    /// The statement could not be started.
    #[error("query failed: {0}")]
    Query(#[from] QueryError),
}
