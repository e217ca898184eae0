//! Template-driven rendering.
//!
//! Rendering goes through three stages, each in its own module:
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Metadata | [`registry`] | [`TemplateRegistry`] of named row templates |
//! | Synthesis | [`document`] | one [`TemplateDocument`] per render call |
//! | Execution | `renderer` | text streamed to a writer by [`Renderer`] |
//!
//! The document is plain MiniJinja. Besides the standard filters, templates
//! can use the functions listed in [`functions`].
//!
//! ## Format strings
//!
//! Any format other than `json`, `jsonp` and `tmpl` is itself a template,
//! rendered once with `data`, `config` and `client` in scope:
//!
//! ```text
//! --format '{% for v in data %}{{ v.name }}={{ v | volume_status }}\n{% endfor %}'
//! ```
//!
//! Backslash escapes in format strings are decoded first, so `\t` and `\n`
//! work from a shell.

pub mod document;
pub mod functions;
pub mod registry;
mod renderer;

pub use document::{synthesize, Definition, Dispatch, RowSource, TemplateDocument};
pub use functions::register_functions;
pub use registry::{
    default_template, names, Field, TemplateMetadata, TemplateRegistry, TemplateRegistryBuilder,
    COLUMN_SEPARATOR,
};
pub use renderer::Renderer;
