use std::io::{self, Write};

use super::{display_width, pad_right};

/// Minimum cell width, padding included.
pub const DEFAULT_MIN_WIDTH: usize = 0;

/// Spaces added after the widest cell of a column.
pub const DEFAULT_PADDING: usize = 2;

/// A writer that aligns tab-separated columns.
///
/// Everything written is buffered. [`finish`](Self::finish) aligns the buffer
/// and writes it to the inner writer; it consumes the aligner, so it runs at
/// most once. If the aligner is dropped without `finish` (an early return or a
/// panic), the buffered text is still aligned and written, ignoring errors.
///
/// [`Write::flush`] only flushes the inner writer. Buffered cells are never
/// emitted before `finish`, since a later row may widen a column.
#[derive(Debug)]
pub struct TabAligner<W: Write> {
    inner: W,
    buf: Vec<u8>,
    min_width: usize,
    padding: usize,
    finished: bool,
}

impl<W: Write> TabAligner<W> {
    /// Wraps `inner` with the default padding of two spaces.
    pub fn new(inner: W) -> Self {
        Self::with_padding(inner, DEFAULT_MIN_WIDTH, DEFAULT_PADDING)
    }

    /// Wraps `inner` with explicit minimum width and padding.
    pub fn with_padding(inner: W, min_width: usize, padding: usize) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            min_width,
            padding,
            finished: false,
        }
    }

    /// Number of bytes waiting for alignment.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Aligns the buffered text and writes it out.
    pub fn finish(mut self) -> io::Result<()> {
        self.finished = true;
        self.emit()
    }

    fn emit(&mut self) -> io::Result<()> {
        let buf = std::mem::take(&mut self.buf);
        let text = String::from_utf8_lossy(&buf);
        let aligned = align_columns(&text, self.min_width, self.padding);
        self.inner.write_all(aligned.as_bytes())?;
        self.inner.flush()
    }
}

impl<W: Write> Write for TabAligner<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write> Drop for TabAligner<W> {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.emit();
        }
    }
}

/// Aligns tab-separated cells in `text`.
///
/// Each `\t` terminates a cell; the text after the last tab of a line is not
/// part of any column. A column block is a run of consecutive lines that all
/// have a terminated cell in that column. Every cell of a block is padded to
/// the block's widest cell plus `padding`, and to at least `min_width`.
pub fn align_columns(text: &str, min_width: usize, padding: usize) -> String {
    if text.is_empty() {
        return String::new();
    }
    let (body, trailing_newline) = match text.strip_suffix('\n') {
        Some(body) => (body, true),
        None => (text, false),
    };

    let lines: Vec<Vec<&str>> = body.split('\n').map(|l| l.split('\t').collect()).collect();
    let terminated = |row: usize| lines[row].len() - 1;

    let mut widths: Vec<Vec<usize>> = (0..lines.len()).map(|r| vec![0; terminated(r)]).collect();
    let columns = (0..lines.len()).map(terminated).max().unwrap_or(0);

    for col in 0..columns {
        let mut row = 0;
        while row < lines.len() {
            if terminated(row) <= col {
                row += 1;
                continue;
            }
            let start = row;
            let mut width = min_width;
            while row < lines.len() && terminated(row) > col {
                width = width.max(display_width(lines[row][col]) + padding);
                row += 1;
            }
            for line_widths in &mut widths[start..row] {
                line_widths[col] = width;
            }
        }
    }

    let mut out = String::with_capacity(text.len() + text.len() / 2);
    for (row, cells) in lines.iter().enumerate() {
        if row > 0 {
            out.push('\n');
        }
        let last = cells.len() - 1;
        for (col, cell) in cells[..last].iter().enumerate() {
            out.push_str(&pad_right(cell, widths[row][col]));
        }
        out.push_str(cells[last]);
    }
    if trailing_newline {
        out.push('\n');
    }
    out
}
