//! Error types for output rendering.
//!
//! [`RenderError`] is the single error type returned by the rendering pipeline.
//! Every variant is fatal for the command that requested the output: nothing is
//! retried and there is no fallback to a simpler format.

use std::error::Error as _;

use thiserror::Error;

/// Error type for rendering operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The custom format string could not be unescaped.
    ///
    /// Reported before any output is written.
    #[error("invalid output format: {0}")]
    Format(String),

    /// The synthesized or custom template failed to compile.
    ///
    /// Reported before any output is written.
    #[error("template error: {0}")]
    Template(String),

    /// The template failed while executing.
    ///
    /// Output produced before the failure may already have reached the stream.
    #[error("template execution failed: {0}")]
    Execution(String),

    /// An explicitly requested template name has no registry entry.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// The template registry was built with conflicting or reserved entries.
    #[error("invalid template registry: {0}")]
    Registry(String),

    /// Writing to the output stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Wraps a MiniJinja error raised while compiling a template.
    pub(crate) fn compile(err: minijinja::Error) -> Self {
        RenderError::Template(describe(&err))
    }

    /// Wraps a MiniJinja error raised while executing a template.
    ///
    /// I/O failures on the output stream are surfaced as [`RenderError::Io`].
    pub(crate) fn execute(err: minijinja::Error) -> Self {
        if err.kind() == minijinja::ErrorKind::WriteFailure {
            if let Some(io) = err
                .source()
                .and_then(|s| s.downcast_ref::<std::io::Error>())
            {
                return RenderError::Io(std::io::Error::new(io.kind(), io.to_string()));
            }
        }
        RenderError::Execution(describe(&err))
    }

    /// Returns true if the failure happened before anything was written.
    pub fn is_before_output(&self) -> bool {
        matches!(
            self,
            RenderError::Format(_)
                | RenderError::Template(_)
                | RenderError::TemplateNotFound(_)
                | RenderError::Registry(_)
        )
    }
}

/// Flattens a MiniJinja error and its source chain into one line.
fn describe(err: &minijinja::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !msg.contains(&text) {
            msg.push_str(": ");
            msg.push_str(&text);
        }
        source = cause.source();
    }
    msg
}
