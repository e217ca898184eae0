//! Diagnostic logging for the CLI.
//!
//! Logs go to stderr so rendered output on stdout can be piped. `RUST_LOG`
//! overrides the level chosen from the command line, e.g.
//! `RUST_LOG=stowage_render=debug` shows every synthesized template.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Level used when `RUST_LOG` is unset.
pub fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Installs the global subscriber. Call once at startup.
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(false)
            .with_line_number(false),
    );
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!(verbose, "logging initialized");
    Ok(())
}
