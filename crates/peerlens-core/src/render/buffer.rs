//! Column-aligned line buffer.

use std::io::{self, Write};

/// Separator written in front of every cell except the first.
pub const COLUMN_SEPARATOR: &str = "| ";

/// Pending table lines and the running width of each column.
///
/// Widths are counted in chars. Every column except the last is padded to
/// its widest cell plus `padding`. The last column is written as-is and
/// trailing spaces are trimmed, so an empty last cell ends the line at `|`.
#[derive(Debug, Default)]
pub struct RenderBuffer {
    padding: usize,
    widths: Vec<usize>,
    lines: Vec<Vec<String>>,
}

impl RenderBuffer {
    pub fn new(padding: usize) -> Self {
        Self {
            padding,
            widths: Vec::new(),
            lines: Vec::new(),
        }
    }

    pub fn push(&mut self, cells: Vec<String>) {
        if self.widths.len() < cells.len() {
            self.widths.resize(cells.len(), 0);
        }
        for (width, cell) in self.widths.iter_mut().zip(&cells) {
            *width = (*width).max(cell.chars().count());
        }
        self.lines.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lay out one line, without the newline.
    pub fn layout(&self, cells: &[String]) -> String {
        let mut line = String::new();
        let last = cells.len().saturating_sub(1);
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                line.push_str(COLUMN_SEPARATOR);
            }
            line.push_str(cell);
            if i < last {
                let target = self.widths[i] + self.padding;
                let used = cell.chars().count();
                line.extend(std::iter::repeat_n(' ', target - used));
            }
        }
        let kept = line.trim_end_matches(' ').len();
        line.truncate(kept);
        line
    }

    /// Every pending line laid out and newline-terminated.
    pub fn compose(&self) -> String {
        let mut text = String::new();
        for cells in &self.lines {
            text.push_str(&self.layout(cells));
            text.push('\n');
        }
        text
    }

    /// Write every pending line to `out` and clear the buffer.
    ///
    /// Returns the number of bytes written. Column widths are kept.
    pub fn drain_to<W: Write + ?Sized>(&mut self, out: &mut W) -> io::Result<usize> {
        if self.is_empty() {
            return Ok(0);
        }
        let text = self.compose();
        out.write_all(text.as_bytes())?;
        self.lines.clear();
        Ok(text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_columns_align_under_widest_cell() {
        let mut buffer = RenderBuffer::new(2);
        buffer.push(cells(&["a", "bb", "c"]));
        buffer.push(cells(&["long value", "x", "tail"]));

        assert_eq!(
            buffer.compose(),
            "a           | bb  | c\nlong value  | x   | tail\n"
        );
    }

    #[test]
    fn test_width_counts_chars_not_bytes() {
        let mut buffer = RenderBuffer::new(1);
        buffer.push(cells(&["héllo", "1"]));
        buffer.push(cells(&["abc", "2"]));

        assert_eq!(buffer.compose(), "héllo | 1\nabc   | 2\n");
    }

    #[test]
    fn test_single_column_is_not_padded() {
        let mut buffer = RenderBuffer::new(2);
        buffer.push(cells(&["only"]));
        buffer.push(cells(&["x"]));
        assert_eq!(buffer.compose(), "only\nx\n");
    }

    #[test]
    fn test_empty_last_cell_leaves_no_trailing_space() {
        let mut buffer = RenderBuffer::new(2);
        buffer.push(cells(&["peer", "rack"]));
        buffer.push(cells(&["172.16.0.9", ""]));
        buffer.push(cells(&["", ""]));

        assert_eq!(
            buffer.compose(),
            "peer        | rack\n172.16.0.9  |\n            |\n"
        );
    }

    #[test]
    fn test_drain_empty_buffer_writes_nothing() {
        let mut buffer = RenderBuffer::new(2);
        let mut out = Vec::new();
        assert_eq!(buffer.drain_to(&mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_drain_clears_lines() {
        let mut buffer = RenderBuffer::new(2);
        buffer.push(cells(&["a", "b"]));
        let mut out = Vec::new();
        let written = buffer.drain_to(&mut out).unwrap();

        assert_eq!(written, out.len());
        assert!(buffer.is_empty());
        assert_eq!(String::from_utf8(out).unwrap(), "a  | b\n");
    }
}
