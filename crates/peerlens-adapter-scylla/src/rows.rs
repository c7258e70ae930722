//! Row source over the driver's paged row iterator.

use crate::convert;
use futures::StreamExt;
use peerlens_core::render::{ColumnDescriptor, RowSource, RowValues};
use scylla::transport::errors::QueryError;
use scylla::transport::iterator::RowIterator;
use tokio::runtime::Handle;

/// Pulls rows page by page from a running query.
///
/// `next_row` blocks the calling thread until the next row arrives, so it
/// must run outside the async context (e.g. in `spawn_blocking`).
pub struct ScyllaRowSource {
    columns: Vec<ColumnDescriptor>,
    rows: RowIterator,
    handle: Handle,
}

impl ScyllaRowSource {
    pub fn new(rows: RowIterator, handle: Handle) -> Self {
        let columns = rows
            .get_column_specs()
            .iter()
            .map(convert::column_descriptor)
            .collect();
        Self {
            columns,
            rows,
            handle,
        }
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }
}

impl RowSource for ScyllaRowSource {
    type Error = QueryError;

    fn next_row(&mut self) -> Result<Option<RowValues>, QueryError> {
        let next = self.handle.block_on(self.rows.next());
        next.transpose()
            .map(|row| row.map(|row| convert::row_values(&row)))
    }
}
