//! Output mode resolution.
//!
//! [`resolve_strategy`] is a pure function from the configured format, the
//! optional raw template, the optional explicit template name and the payload
//! shape to exactly one [`Strategy`]:
//!
//! | Format (case-insensitive) | Raw template | Strategy |
//! |---------------------------|--------------|----------|
//! | `json` | ignored | [`Strategy::Json`] |
//! | `jsonp` | ignored | [`Strategy::PrettyJson`] |
//! | `tmpl` | absent | [`Strategy::Builtin`] |
//! | `tmpl` | present | [`Strategy::Custom`] (raw template) |
//! | anything else | absent | [`Strategy::Custom`] (format string) |
//! | anything else | present | [`Strategy::Custom`] (raw template) |
//!
//! Custom bodies are unescaped with [`crate::escape::unescape`].

use crate::error::RenderError;
use crate::escape::unescape;
use crate::payload::PayloadShape;
use crate::template::registry::default_template;

/// How a payload is turned into text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Compact JSON.
    Json,
    /// Indented JSON.
    PrettyJson,
    /// A registry template, iterated over the payload.
    Builtin { name: String },
    /// A one-off template body, applied once to the whole payload.
    Custom { body: String },
}

impl Strategy {
    /// Whether output goes through the column-aligning writer when enabled.
    pub fn is_tabular(&self) -> bool {
        matches!(self, Strategy::Builtin { .. } | Strategy::Custom { .. })
    }
}

/// Selects the rendering strategy.
///
/// An explicit `template_name` is only honoured in built-in mode, where it
/// takes precedence over the shape's default.
///
/// # Errors
///
/// Returns [`RenderError::Format`] if a custom body contains a malformed
/// escape sequence.
///
/// # Example
///
/// ```rust
/// use stowage_render::mode::{resolve_strategy, Strategy};
/// use stowage_render::payload::{PayloadShape, RecordKind};
///
/// let shape = PayloadShape::List(RecordKind::Volume);
/// assert_eq!(resolve_strategy("JSON", None, None, shape).unwrap(), Strategy::Json);
/// assert_eq!(
///     resolve_strategy("tmpl", None, None, shape).unwrap(),
///     Strategy::Builtin { name: "volume fields".into() },
/// );
/// assert_eq!(
///     resolve_strategy(r#"{{ data | length }}\n"#, None, None, shape).unwrap(),
///     Strategy::Custom { body: "{{ data | length }}\n".into() },
/// );
/// ```
pub fn resolve_strategy(
    format: &str,
    template: Option<&str>,
    template_name: Option<&str>,
    shape: PayloadShape,
) -> Result<Strategy, RenderError> {
    let template = template.filter(|t| !t.is_empty());

    if format.eq_ignore_ascii_case("json") {
        return Ok(Strategy::Json);
    }
    if format.eq_ignore_ascii_case("jsonp") {
        return Ok(Strategy::PrettyJson);
    }
    if format.eq_ignore_ascii_case("tmpl") && template.is_none() {
        let name = template_name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| default_template(shape));
        return Ok(Strategy::Builtin {
            name: name.to_string(),
        });
    }

    let body = unescape(template.unwrap_or(format))?;
    Ok(Strategy::Custom { body })
}
