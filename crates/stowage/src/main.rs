//! `stowage` renders storage records read as JSON.
//!
//! ```text
//! stowage render --kind volumes --input volumes.json
//! stowage render --kind volumes --format jsonp < volumes.json
//! stowage render --kind snapshots --format '{{ data | length }} snapshots\n'
//! ```

mod cli;
mod input;
mod logging;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use stowage_render::{RenderConfig, Renderer, StaticClient};

use cli::{Cli, Command, RenderArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    match cli.command {
        Command::Render(args) => render(args),
    }
}

fn render(args: RenderArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => RenderConfig::from_path(path)
            .with_context(|| format!("cannot load output settings from {}", path.display()))?,
        None => RenderConfig::default(),
    };
    let config = args.output.apply(config);

    let renderer = Renderer::with_builtins(config, Arc::new(StaticClient::default()));
    let payload = input::read_payload(args.kind, args.input.as_deref());
    renderer.must_marshal_output(args.template_name.as_deref(), payload);
    Ok(())
}
