//! Process-wide output configuration.
//!
//! [`RenderConfig`] holds the settings that apply to every render call of a
//! command: the output format, an optional raw template, tab alignment and the
//! quiet flag. It can be loaded from YAML and overlaid with command-line flags
//! through [`OutputArgs`].
//!
//! ```rust
//! use stowage_render::RenderConfig;
//!
//! let config = RenderConfig::from_yaml("format: jsonp\nquiet: true\n").unwrap();
//! assert_eq!(config.format, "jsonp");
//! assert!(config.quiet);
//! assert!(config.template_tabs);
//! ```

use std::path::Path;

use clap::Args;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format name selecting the built-in table templates.
pub const DEFAULT_FORMAT: &str = "tmpl";

/// Output settings shared by all render calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    /// `json`, `jsonp`, `tmpl`, or a custom template body.
    pub format: String,
    /// Raw template body. Takes precedence over a custom `format`.
    pub template: Option<String>,
    /// Align tab-separated columns before writing.
    pub template_tabs: bool,
    /// Suppress table headers.
    pub quiet: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.to_string(),
            template: None,
            template_tabs: true,
            quiet: false,
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl RenderConfig {
    /// Parses configuration from YAML. Missing keys keep their defaults.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(source)?)
    }

    /// Reads and parses a YAML configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&source)
    }

    /// Sets the output format.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Sets the raw template body.
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Enables or disables column alignment.
    pub fn template_tabs(mut self, enabled: bool) -> Self {
        self.template_tabs = enabled;
        self
    }

    /// Enables or disables quiet mode.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Returns the raw template body, treating an empty string as absent.
    pub fn template_body(&self) -> Option<&str> {
        self.template.as_deref().filter(|t| !t.is_empty())
    }
}

/// Command-line flags controlling output.
///
/// Flatten into a clap command with `#[command(flatten)]`. Flags that are not
/// given leave the underlying configuration untouched.
#[derive(Debug, Clone, Default, Args)]
pub struct OutputArgs {
    /// Output format: json, jsonp, tmpl, or a template body
    #[arg(short = 'f', long = "format")]
    pub format: Option<String>,

    /// Template body used to render the output
    #[arg(long = "template")]
    pub template: Option<String>,

    /// Align tab-separated output columns
    #[arg(long = "template-tabs")]
    pub template_tabs: Option<bool>,

    /// Suppress table headers
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl OutputArgs {
    /// Overlays the flags onto `config`.
    pub fn apply(&self, mut config: RenderConfig) -> RenderConfig {
        if let Some(format) = &self.format {
            config.format = format.clone();
        }
        if let Some(template) = &self.template {
            config.template = Some(template.clone());
        }
        if let Some(tabs) = self.template_tabs {
            config.template_tabs = tabs;
        }
        if self.quiet {
            config.quiet = true;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        output: OutputArgs,
    }

    #[test]
    fn defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.format, "tmpl");
        assert!(config.template_tabs);
        assert!(!config.quiet);
        assert_eq!(config.template_body(), None);
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(RenderConfig::from_yaml("").unwrap(), RenderConfig::default());
    }

    #[test]
    fn yaml_uses_camel_case_keys() {
        let config = RenderConfig::from_yaml("templateTabs: false\ntemplate: '{{ data }}'\n")
            .unwrap();
        assert!(!config.template_tabs);
        assert_eq!(config.template_body(), Some("{{ data }}"));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let err = RenderConfig::from_yaml("quiet: [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.yaml");
        std::fs::write(&path, "format: json\n").unwrap();
        assert_eq!(RenderConfig::from_path(&path).unwrap().format, "json");
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = RenderConfig::from_path("/nonexistent/stowage.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/stowage.yaml"));
    }

    #[test]
    fn empty_template_counts_as_absent() {
        let config = RenderConfig::default().template("");
        assert_eq!(config.template_body(), None);
    }

    #[test]
    fn args_overlay_config() {
        let cli = Cli::parse_from(["app", "-f", "jsonp", "--template-tabs", "false", "-q"]);
        let config = cli.output.apply(RenderConfig::default());
        assert_eq!(config.format, "jsonp");
        assert!(!config.template_tabs);
        assert!(config.quiet);
    }

    #[test]
    fn absent_args_keep_config() {
        let cli = Cli::parse_from(["app"]);
        let base = RenderConfig::default().format("json").quiet(true);
        assert_eq!(cli.output.apply(base.clone()), base);
    }
}
