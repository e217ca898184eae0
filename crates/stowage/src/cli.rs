//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use stowage_render::OutputArgs;

use crate::input::Kind;

#[derive(Debug, Parser)]
#[command(name = "stowage", version, about = "Inspect storage volumes, snapshots and mounts")]
pub struct Cli {
    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a JSON document of storage records
    Render(RenderArgs),
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Kind of records in the input
    #[arg(short, long, value_enum)]
    pub kind: Kind,

    /// Input file, stdin when omitted or `-`
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// YAML file with output settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Built-in template to use instead of the default for the kind
    #[arg(long)]
    pub template_name: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_render_command() {
        let cli = Cli::try_parse_from([
            "stowage",
            "render",
            "--kind",
            "volumes-with-path",
            "--format",
            "jsonp",
            "-q",
            "--template-name",
            "volume id",
        ])
        .unwrap();
        let Command::Render(args) = cli.command;
        assert_eq!(args.kind, Kind::VolumesWithPath);
        assert_eq!(args.output.format.as_deref(), Some("jsonp"));
        assert!(args.output.quiet);
        assert_eq!(args.template_name.as_deref(), Some("volume id"));
        assert!(args.input.is_none());
    }

    #[test]
    fn kind_is_required() {
        assert!(Cli::try_parse_from(["stowage", "render"]).is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["stowage", "render", "-k", "strings", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
