//! The output renderer.
//!
//! [`Renderer`] ties the pieces together for one output call:
//!
//! 1. resolve the [`Strategy`] from the configuration and payload shape
//! 2. synthesize the [`TemplateDocument`](super::TemplateDocument)
//! 3. compile it in a fresh MiniJinja environment with the rendering functions
//! 4. execute it against `config`, `client` and `data`, streaming into the
//!    writer, through a [`TabAligner`] when columns should line up
//!
//! An environment lives for a single call because the `volume_status`
//! function captures the client.

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use tracing::{debug, error};

use super::document::synthesize;
use super::functions::register_functions;
use super::registry::TemplateRegistry;
use crate::client::VolumeClient;
use crate::config::RenderConfig;
use crate::context::template_context;
use crate::error::RenderError;
use crate::mode::{resolve_strategy, Strategy};
use crate::payload::Payload;
use crate::tabular::TabAligner;

/// Name the synthesized document is compiled under.
const DOCUMENT_NAME: &str = "output";

/// Renders payloads according to a [`RenderConfig`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use stowage_render::{Payload, RenderConfig, Renderer, StaticClient, Volume};
///
/// let renderer = Renderer::with_builtins(
///     RenderConfig::default().template_tabs(false),
///     Arc::new(StaticClient::default()),
/// );
/// let volumes = vec![Volume::new("vol-2", "b"), Volume::new("vol-1", "a")];
/// let out = renderer.render_to_string(None, Payload::Volumes(volumes)).unwrap();
/// assert_eq!(
///     out,
///     "ID\tName\tStatus\tSize\nvol-1\ta\tavailable\t0\nvol-2\tb\tavailable\t0\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Renderer {
    registry: Arc<TemplateRegistry>,
    config: RenderConfig,
    client: Arc<dyn VolumeClient>,
}

impl Renderer {
    pub fn new(
        registry: Arc<TemplateRegistry>,
        config: RenderConfig,
        client: Arc<dyn VolumeClient>,
    ) -> Self {
        Self {
            registry,
            config,
            client,
        }
    }

    /// Creates a renderer over the built-in templates.
    pub fn with_builtins(config: RenderConfig, client: Arc<dyn VolumeClient>) -> Self {
        Self::new(Arc::new(TemplateRegistry::builtin()), config, client)
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn client(&self) -> &Arc<dyn VolumeClient> {
        &self.client
    }

    /// Renders `payload` into `out`.
    ///
    /// `template_name` selects a registry entry explicitly; it only matters
    /// when the format is `tmpl` and no raw template is configured.
    ///
    /// When tab alignment applies, the aligned text is written out whether
    /// or not rendering succeeded, so partial output is never lost.
    ///
    /// Undefined values are errors: a template that reads a field the payload
    /// does not have fails instead of printing an empty cell.
    ///
    /// # Errors
    ///
    /// - [`RenderError::Format`] for a malformed custom format
    /// - [`RenderError::TemplateNotFound`] for an unknown template name
    /// - [`RenderError::Template`] when the document does not compile
    /// - [`RenderError::Execution`] when a template fails at runtime
    /// - [`RenderError::Io`] when `out` cannot be written
    pub fn render<W: Write>(
        &self,
        out: &mut W,
        template_name: Option<&str>,
        payload: Payload,
    ) -> Result<(), RenderError> {
        let strategy = resolve_strategy(
            &self.config.format,
            self.config.template_body(),
            template_name,
            payload.shape(),
        )?;

        let payload = match (&strategy, payload) {
            (Strategy::Builtin { .. }, Payload::Strings(mut strings)) => {
                strings.sort();
                Payload::Strings(strings)
            }
            (Strategy::Builtin { .. }, payload) => match payload.into_list() {
                Ok(list) => return self.render(out, template_name, list),
                Err(payload) => payload,
            },
            (_, payload) => payload,
        };

        let document = synthesize(&self.registry, &strategy, self.config.quiet)?;
        let source = document.to_string();
        debug!(?strategy, template = %source, "built output template");

        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        register_functions(&mut env, Arc::clone(&self.client));
        env.add_template(DOCUMENT_NAME, &source)
            .map_err(RenderError::compile)?;
        let template = env
            .get_template(DOCUMENT_NAME)
            .map_err(RenderError::compile)?;

        let ctx = template_context(&self.config, &self.client, &payload);

        if self.config.template_tabs && strategy.is_tabular() {
            let mut aligner = TabAligner::new(&mut *out);
            let rendered = template
                .render_captured_to(ctx, &mut aligner)
                .map(drop)
                .map_err(RenderError::execute);
            let finished = aligner.finish().map_err(RenderError::from);
            rendered.and(finished)
        } else {
            template
                .render_captured_to(ctx, &mut *out)
                .map_err(RenderError::execute)?;
            out.flush()?;
            Ok(())
        }
    }

    /// Renders into a string.
    pub fn render_to_string(
        &self,
        template_name: Option<&str>,
        payload: Payload,
    ) -> Result<String, RenderError> {
        let mut buf = Vec::new();
        self.render(&mut buf, template_name, payload)?;
        String::from_utf8(buf)
            .map_err(|e| RenderError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    /// Renders to stdout, terminating the process on failure.
    ///
    /// The error is logged and the process exits with status 1.
    pub fn marshal_output(&self, template_name: Option<&str>, payload: Payload) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if let Err(err) = self.render(&mut out, template_name, payload) {
            fatal(&err);
        }
    }

    /// Like [`marshal_output`](Self::marshal_output), for a payload that may
    /// have failed upstream. An upstream error is fatal as well.
    pub fn must_marshal_output<E: fmt::Display>(
        &self,
        template_name: Option<&str>,
        result: Result<Payload, E>,
    ) {
        match result {
            Ok(payload) => self.marshal_output(template_name, payload),
            Err(err) => fatal(&err),
        }
    }
}

fn fatal(err: &dyn fmt::Display) -> ! {
    error!(error = %err, "cannot produce output");
    std::process::exit(1)
}
