//! Error types for the core crate.

use thiserror::Error;

/// Errors that can occur while rendering a result table.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A row's value count does not match the column count.
    #[error("malformed row {row}: expected {expected} values, got {actual}")]
    MalformedRow {
        /// Zero-based index of the offending row in the stream.
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// The row source failed mid-iteration.
    #[error("row stream failed after {rows} rows: {source}")]
    Stream {
        rows: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The output sink rejected a write.
    #[error("failed to write table: {0}")]
    Write(#[from] std::io::Error),
}

impl RenderError {
    /// Wrap a row source error, recording how many rows were already rendered.
    pub fn stream<E>(rows: usize, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Stream {
            rows,
            source: Box::new(source),
        }
    }
}
