//! Column alignment for tab-separated output.
//!
//! Built-in templates separate columns with `\t`. When tab alignment is on,
//! output passes through a [`TabAligner`], which buffers everything and, on
//! [`TabAligner::finish`], rewrites each block of tab-separated cells with
//! space padding so columns line up.
//!
//! ```rust
//! use std::io::Write;
//! use stowage_render::tabular::TabAligner;
//!
//! let mut out = Vec::new();
//! let mut aligner = TabAligner::new(&mut out);
//! write!(aligner, "ID\tName\nvol-1\tdata\n").unwrap();
//! aligner.finish().unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "ID     Name\nvol-1  data\n");
//! ```
//!
//! Widths are measured in terminal columns, so wide characters and ANSI escape
//! codes are handled the same way as elsewhere in the crate.

mod aligner;

pub use aligner::{align_columns, TabAligner, DEFAULT_MIN_WIDTH, DEFAULT_PADDING};

use console::{measure_text_width, pad_str, Alignment};

/// Returns the display width of a string, ignoring ANSI escape codes.
///
/// ```rust
/// use stowage_render::tabular::display_width;
///
/// assert_eq!(display_width("hello"), 5);
/// assert_eq!(display_width("\x1b[31mred\x1b[0m"), 3);
/// assert_eq!(display_width("日本"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    measure_text_width(s)
}

/// Pads a string on the right to reach the target width.
///
/// ```rust
/// use stowage_render::tabular::pad_right;
///
/// assert_eq!(pad_right("42", 5), "42   ");
/// assert_eq!(pad_right("hello", 3), "hello");
/// ```
pub fn pad_right(s: &str, width: usize) -> String {
    pad_str(s, width, Alignment::Left, None).into_owned()
}
