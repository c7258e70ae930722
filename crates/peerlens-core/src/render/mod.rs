//! Tabular result rendering.
//!
//! Turns column descriptors and a row stream into an aligned text table:
//!
//! ```text
//! id (int)  | name (text)
//! 1         | alice
//! 2         | bob
//!
//! ```
//!
//! Alignment spans the whole table, so lines are buffered and written when
//! the table is flushed. A [`TableWriter`] guarantees that flush on every
//! exit path: partial output followed by an error beats no output.

pub mod buffer;
pub mod source;
pub mod value;

pub use buffer::{COLUMN_SEPARATOR, RenderBuffer};
pub use source::{IterRows, RowSource};
pub use value::{CellValue, ColumnDescriptor, RowValues};

use crate::error::RenderError;
use std::io::Write;

/// Spaces added after the widest cell of each column.
pub const DEFAULT_PADDING: usize = 2;

/// Lifecycle of a single render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    HeaderWritten,
    RowWritten,
    Flushed,
    /// Terminal state after a successful render.
    Closed,
    /// Terminal state after an error; buffered output was flushed first.
    Failed,
}

/// Outcome of a successful render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    /// Rows rendered, not counting the header.
    pub rows: usize,
    /// Bytes written to the output sink.
    pub bytes: usize,
}

/// Scoped owner of the output sink for one render call.
///
/// Buffered lines are written out by [`finish`](Self::finish) on success and
/// by [`abort`](Self::abort) on failure. If neither runs (early return,
/// panic), dropping the writer still flushes what was buffered. The sink is
/// flushed but never closed.
pub struct TableWriter<'a, W: Write + ?Sized> {
    out: &'a mut W,
    buffer: RenderBuffer,
    state: RenderState,
    bytes: usize,
}

impl<'a, W: Write + ?Sized> TableWriter<'a, W> {
    pub fn new(out: &'a mut W, padding: usize) -> Self {
        Self {
            out,
            buffer: RenderBuffer::new(padding),
            state: RenderState::Idle,
            bytes: 0,
        }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn header(&mut self, cells: Vec<String>) {
        debug_assert_eq!(self.state, RenderState::Idle);
        self.buffer.push(cells);
        self.state = RenderState::HeaderWritten;
    }

    pub fn row(&mut self, cells: Vec<String>) {
        debug_assert!(matches!(
            self.state,
            RenderState::HeaderWritten | RenderState::RowWritten
        ));
        self.buffer.push(cells);
        self.state = RenderState::RowWritten;
    }

    fn flush_buffered(&mut self) -> std::io::Result<()> {
        self.bytes += self.buffer.drain_to(&mut *self.out)?;
        self.out.flush()
    }

    fn write_closing(&mut self) -> std::io::Result<()> {
        self.bytes += self.buffer.drain_to(&mut *self.out)?;
        self.out.write_all(b"\n")?;
        self.bytes += 1;
        self.out.flush()
    }

    /// Write the table and its trailing blank line, then flush.
    ///
    /// Returns the total number of bytes written.
    pub fn finish(mut self) -> Result<usize, RenderError> {
        match self.write_closing() {
            Ok(()) => {
                self.state = RenderState::Flushed;
                tracing::debug!(bytes = self.bytes, "Table flushed");
                self.state = RenderState::Closed;
                Ok(self.bytes)
            }
            Err(e) => {
                self.state = RenderState::Failed;
                Err(RenderError::Write(e))
            }
        }
    }

    /// Flush whatever was buffered after `cause` ended the render.
    pub fn abort(mut self, cause: &RenderError) {
        match self.flush_buffered() {
            Ok(()) => self.state = RenderState::Flushed,
            Err(e) => {
                tracing::warn!(error = %e, cause = %cause, "Failed to flush partial table");
            }
        }
        self.state = RenderState::Failed;
    }
}

impl<W: Write + ?Sized> Drop for TableWriter<'_, W> {
    fn drop(&mut self) {
        if matches!(
            self.state,
            RenderState::Idle | RenderState::HeaderWritten | RenderState::RowWritten
        ) {
            if let Err(e) = self.flush_buffered() {
                tracing::warn!(error = %e, "Failed to flush table on drop");
            }
            self.state = RenderState::Failed;
        }
    }
}

/// Renders column descriptors and row streams as aligned text.
#[derive(Debug, Clone, Copy)]
pub struct TabularResultRenderer {
    padding: usize,
}

impl Default for TabularResultRenderer {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
        }
    }
}

impl TabularResultRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_padding(padding: usize) -> Self {
        Self { padding }
    }

    pub fn padding(&self) -> usize {
        self.padding
    }

    /// Header cells, one `name (type)` label per column.
    pub fn render_header(&self, columns: &[ColumnDescriptor]) -> Vec<String> {
        columns.iter().map(ColumnDescriptor::label).collect()
    }

    /// Display form of each value of row number `row`.
    pub fn render_row(
        &self,
        columns: &[ColumnDescriptor],
        row: usize,
        values: &[CellValue],
    ) -> Result<Vec<String>, RenderError> {
        if values.len() != columns.len() {
            return Err(RenderError::MalformedRow {
                row,
                expected: columns.len(),
                actual: values.len(),
            });
        }
        Ok(values.iter().map(ToString::to_string).collect())
    }

    /// Render the header, every row in source order and a trailing blank
    /// line to `out`.
    ///
    /// A malformed row or a row source error stops the render; the header
    /// and the rows before it are still written and flushed before the error
    /// is returned.
    pub fn render<R, W>(
        &self,
        columns: &[ColumnDescriptor],
        rows: &mut R,
        out: &mut W,
    ) -> Result<RenderSummary, RenderError>
    where
        R: RowSource + ?Sized,
        W: Write + ?Sized,
    {
        let mut writer = TableWriter::new(out, self.padding);
        writer.header(self.render_header(columns));

        let mut rendered = 0;
        loop {
            let values = match rows.next_row() {
                Ok(Some(values)) => values,
                Ok(None) => break,
                Err(e) => {
                    let err = RenderError::stream(rendered, e);
                    writer.abort(&err);
                    return Err(err);
                }
            };

            match self.render_row(columns, rendered, &values) {
                Ok(cells) => writer.row(cells),
                Err(err) => {
                    writer.abort(&err);
                    return Err(err);
                }
            }
            rendered += 1;
        }

        let bytes = writer.finish()?;
        tracing::debug!(rows = rendered, bytes, "Rendered table");
        Ok(RenderSummary {
            rows: rendered,
            bytes,
        })
    }

    /// Render into a string.
    pub fn render_to_string<R>(
        &self,
        columns: &[ColumnDescriptor],
        rows: &mut R,
    ) -> Result<String, RenderError>
    where
        R: RowSource + ?Sized,
    {
        let mut out = Vec::new();
        self.render(columns, rows, &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("id", "int"),
            ColumnDescriptor::new("name", "text"),
        ]
    }

    /// Accepts writes until `limit` bytes, then fails.
    struct BrokenPipe {
        written: Vec<u8>,
        limit: usize,
    }

    impl Write for BrokenPipe {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written.len() + buf.len() > self.limit {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_render_header() {
        let renderer = TabularResultRenderer::new();
        assert_eq!(
            renderer.render_header(&columns()),
            vec!["id (int)".to_string(), "name (text)".to_string()]
        );
    }

    #[test]
    fn test_render_row_null_is_empty() {
        let renderer = TabularResultRenderer::new();
        let cells = renderer
            .render_row(&columns(), 0, &[1.into(), CellValue::Null])
            .unwrap();
        assert_eq!(cells, vec!["1".to_string(), String::new()]);
    }

    #[test]
    fn test_render_row_count_mismatch() {
        let renderer = TabularResultRenderer::new();
        let err = renderer
            .render_row(&columns(), 3, &[1.into()])
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::MalformedRow {
                row: 3,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_render_summary_counts() {
        let renderer = TabularResultRenderer::new();
        let mut rows = IterRows::infallible(vec![vec![1.into(), "alice".into()]]);
        let mut out = Vec::new();
        let summary = renderer.render(&columns(), &mut rows, &mut out).unwrap();

        assert_eq!(summary.rows, 1);
        assert_eq!(summary.bytes, out.len());
    }

    #[test]
    fn test_render_no_rows() {
        let renderer = TabularResultRenderer::new();
        let mut rows = IterRows::infallible(Vec::new());
        let text = renderer.render_to_string(&columns(), &mut rows).unwrap();
        assert_eq!(text, "id (int)  | name (text)\n\n");
    }

    #[test]
    fn test_render_write_failure_is_reported() {
        let renderer = TabularResultRenderer::new();
        let mut rows = IterRows::infallible(vec![vec![1.into(), "alice".into()]]);
        let mut out = BrokenPipe {
            written: Vec::new(),
            limit: 4,
        };
        let err = renderer.render(&columns(), &mut rows, &mut out).unwrap_err();
        assert!(matches!(err, RenderError::Write(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn test_writer_states() {
        let mut out = Vec::new();
        let mut writer = TableWriter::new(&mut out, DEFAULT_PADDING);
        assert_eq!(writer.state(), RenderState::Idle);
        writer.header(vec!["a (int)".to_string()]);
        assert_eq!(writer.state(), RenderState::HeaderWritten);
        writer.row(vec!["1".to_string()]);
        assert_eq!(writer.state(), RenderState::RowWritten);
        let bytes = writer.finish().unwrap();
        assert_eq!(bytes, out.len());
        assert_eq!(String::from_utf8(out).unwrap(), "a (int)\n1\n\n");
    }

    #[test]
    fn test_writer_flushes_on_drop() {
        let mut out = Vec::new();
        {
            let mut writer = TableWriter::new(&mut out, DEFAULT_PADDING);
            writer.header(vec!["a (int)".to_string(), "b (text)".to_string()]);
            writer.row(vec!["1".to_string(), "x".to_string()]);
        }
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a (int)  | b (text)\n1        | x\n"
        );
    }
}
