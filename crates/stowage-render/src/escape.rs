//! Backslash unescaping for custom output formats.
//!
//! Custom formats arrive from the command line, where typing a literal tab or
//! quote is awkward. The format is unescaped once before it becomes a template
//! body. Supported sequences:
//!
//! | Sequence | Result |
//! |----------|--------|
//! | `\\` | `\` |
//! | `\"` | `"` |
//! | `\'` | `'` |
//! | `\n` | newline |
//! | `\r` | carriage return |
//! | `\t` | tab |
//! | `\0` | NUL |
//! | `\u{XXXX}` | the Unicode scalar `XXXX` (1-6 hex digits) |
//!
//! A bare `"` is kept as is. Any other escape, and a trailing lone backslash,
//! is rejected.

use crate::error::RenderError;

/// Unescapes a custom format string.
///
/// # Example
///
/// ```rust
/// use stowage_render::escape::unescape;
///
/// assert_eq!(unescape(r#"{{ data.name }}\t\"x\""#).unwrap(), "{{ data.name }}\t\"x\"");
/// assert!(unescape(r"broken\").is_err());
/// ```
pub fn unescape(input: &str) -> Result<String, RenderError> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.char_indices();

    while let Some((_, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some((pos, esc)) = chars.next() else {
            return Err(RenderError::Format(
                "format ends with an unterminated escape sequence".to_string(),
            ));
        };
        match esc {
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            '0' => out.push('\0'),
            'u' => out.push(unicode_escape(&mut chars, pos)?),
            other => {
                return Err(RenderError::Format(format!(
                    "unknown escape sequence `\\{}` at byte {}",
                    other,
                    pos - 1
                )))
            }
        }
    }

    Ok(out)
}

fn unicode_escape(chars: &mut std::str::CharIndices<'_>, pos: usize) -> Result<char, RenderError> {
    let malformed = || {
        RenderError::Format(format!(
            "malformed unicode escape at byte {}, expected `\\u{{XXXX}}`",
            pos - 1
        ))
    };

    if !matches!(chars.next(), Some((_, '{'))) {
        return Err(malformed());
    }
    let mut digits = String::new();
    loop {
        match chars.next() {
            Some((_, '}')) => break,
            Some((_, d)) if d.is_ascii_hexdigit() && digits.len() < 6 => digits.push(d),
            _ => return Err(malformed()),
        }
    }
    u32::from_str_radix(&digits, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(malformed)
}
