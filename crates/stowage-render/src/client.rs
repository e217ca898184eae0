//! The storage client collaborator.
//!
//! Templates can ask the active client for a volume's current status through
//! the `volume_status` filter. The renderer only needs this narrow view of the
//! client, captured by [`VolumeClient`].

use std::fmt::Debug;

use thiserror::Error;

use crate::model::Volume;

/// Errors reported by a [`VolumeClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("status lookup failed for volume {volume}: {reason}")]
    StatusLookup { volume: String, reason: String },

    #[error("storage service unavailable: {0}")]
    Unavailable(String),
}

/// The part of the storage client used while rendering.
pub trait VolumeClient: Debug + Send + Sync {
    /// Name of the service or host the client talks to.
    fn name(&self) -> &str;

    /// Resolves the current status of a volume, e.g. `attached` or `available`.
    fn volume_status(&self, volume: &Volume) -> Result<String, ClientError>;
}

/// A client that derives status from the volume's own attachment list.
///
/// Volumes with at least one attachment are `attached`, others `available`.
/// Useful offline and in tests.
#[derive(Debug, Clone)]
pub struct StaticClient {
    name: String,
}

impl StaticClient {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for StaticClient {
    fn default() -> Self {
        Self::new("local")
    }
}

impl VolumeClient for StaticClient {
    fn name(&self) -> &str {
        &self.name
    }

    fn volume_status(&self, volume: &Volume) -> Result<String, ClientError> {
        if volume.attachments.is_empty() {
            Ok("available".to_string())
        } else {
            Ok("attached".to_string())
        }
    }
}
