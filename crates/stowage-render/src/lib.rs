//! # Stowage Render - Output Formatting for the Storage CLI
//!
//! `stowage-render` turns the results of storage commands (volumes, snapshots,
//! services, instances, mounts, plain string lists, arbitrary values) into
//! text on an output stream.
//!
//! ## Output modes
//!
//! The configured format picks one of four strategies, see [`mode`]:
//!
//! | Format | Output |
//! |--------|--------|
//! | `json` | compact JSON of the payload |
//! | `jsonp` | indented JSON of the payload |
//! | `tmpl` | a built-in table chosen by payload shape |
//! | anything else | the format string itself, used as a template |
//!
//! ## Core Concepts
//!
//! - [`Payload`]: closed set of renderable values, tagged by [`PayloadShape`]
//! - [`TemplateRegistry`]: named row templates with headers and sort keys
//! - [`Renderer`]: resolves the strategy and streams the output
//! - [`TabAligner`](tabular::TabAligner): aligns tab-separated columns
//! - [`VolumeClient`]: the storage client, used to resolve volume status
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use stowage_render::{Payload, RenderConfig, Renderer, StaticClient, Volume};
//!
//! let renderer = Renderer::with_builtins(RenderConfig::default(), Arc::new(StaticClient::default()));
//!
//! let volumes = vec![
//!     Volume::new("vol-0002", "logs").with_size(20),
//!     Volume::new("vol-0001", "data").with_size(100),
//! ];
//! let out = renderer.render_to_string(None, Payload::Volumes(volumes)).unwrap();
//! assert_eq!(
//!     out,
//!     "ID        Name  Status     Size\n\
//!      vol-0001  data  available  100\n\
//!      vol-0002  logs  available  20\n"
//! );
//!
//! let json = Renderer::with_builtins(
//!     RenderConfig::default().format("json"),
//!     Arc::new(StaticClient::default()),
//! );
//! let out = json.render_to_string(None, Payload::Strings(vec!["b".into(), "a".into()])).unwrap();
//! assert_eq!(out, "[\"b\",\"a\"]\n");
//! ```
//!
//! ## Errors
//!
//! Every failure is a [`RenderError`] and is fatal for the command that asked
//! for output. Command-line programs usually go through
//! [`Renderer::must_marshal_output`], which logs the error and exits with
//! status 1.

pub mod client;
pub mod config;
pub mod context;
mod error;
pub mod escape;
pub mod mode;
pub mod model;
pub mod payload;
pub mod tabular;
pub mod template;

pub use error::RenderError;

pub use client::{ClientError, StaticClient, VolumeClient};
pub use config::{ConfigError, OutputArgs, RenderConfig, DEFAULT_FORMAT};
pub use mode::{resolve_strategy, Strategy};
pub use model::{
    DriverInfo, Instance, InstanceId, MountInfo, ServiceInfo, Snapshot, Volume, VolumeAttachment,
    VolumeWithPath,
};
pub use payload::{Payload, PayloadShape, RecordKind};
pub use template::{names, Renderer, TemplateMetadata, TemplateRegistry};
