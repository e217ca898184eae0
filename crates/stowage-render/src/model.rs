//! Storage records rendered by the CLI.
//!
//! These are plain data carriers. They serialize with camelCase keys, which is
//! also the attribute naming templates use (`row.volumeID`, `row.mountPoint`).

use serde::{Deserialize, Serialize};

/// A storage volume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Volume {
    pub id: String,
    pub name: String,
    /// Size in GiB.
    pub size: i64,
    pub iops: i64,
    pub status: String,
    #[serde(rename = "type")]
    pub volume_type: String,
    pub availability_zone: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<VolumeAttachment>,
}

impl Volume {
    /// Creates a volume with the given id and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the size in GiB.
    pub fn with_size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }

    /// Adds an attachment.
    pub fn attached_to(mut self, attachment: VolumeAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Where a volume is attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VolumeAttachment {
    #[serde(rename = "instanceID")]
    pub instance_id: InstanceId,
    pub device_name: String,
    pub mount_point: String,
    pub status: String,
}

/// A volume together with the local path it is mounted at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeWithPath {
    #[serde(flatten)]
    pub volume: Volume,
    #[serde(default)]
    pub path: String,
}

/// A point-in-time copy of a volume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub id: String,
    pub name: String,
    pub status: String,
    #[serde(rename = "volumeID")]
    pub volume_id: String,
    pub volume_size: i64,
    pub start_time: i64,
    pub description: String,
    pub encrypted: bool,
}

impl Snapshot {
    /// Creates a snapshot of `volume_id`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        volume_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            volume_id: volume_id.into(),
            ..Self::default()
        }
    }
}

/// A configured storage service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceInfo {
    pub name: String,
    pub driver: DriverInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<Instance>,
}

/// The storage driver backing a service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub driver_type: String,
}

/// A compute instance as seen by a storage driver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Instance {
    #[serde(rename = "instanceID")]
    pub instance_id: InstanceId,
    pub name: String,
    pub provider_name: String,
    pub region: String,
}

/// Driver-qualified instance identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceId {
    pub id: String,
    pub driver: String,
}

/// A mounted filesystem on the local host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MountInfo {
    pub id: i64,
    pub source: String,
    pub mount_point: String,
    pub fs_type: String,
    pub options: String,
}
