//! Closed set of values the renderer knows how to project.
//!
//! [`Payload`] carries typed data for every shape that has a default template,
//! plus [`Payload::Other`] for anything else. [`PayloadShape`] is the data-less
//! tag the mode resolver dispatches on.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::model::{Instance, MountInfo, ServiceInfo, Snapshot, Volume, VolumeWithPath};

/// Record kinds with built-in table layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Volume,
    VolumeWithPath,
    Snapshot,
    Service,
    Instance,
    Mount,
}

/// Shape of a payload, without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadShape {
    /// One record of a known kind.
    Single(RecordKind),
    /// A homogeneous list of a known kind.
    List(RecordKind),
    /// Records keyed by name.
    Map(RecordKind),
    /// A list of plain strings.
    Strings,
    /// Anything else.
    Other,
}

/// A value to render.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Volume(Volume),
    Volumes(Vec<Volume>),
    VolumeWithPath(VolumeWithPath),
    VolumesWithPath(Vec<VolumeWithPath>),
    Snapshot(Snapshot),
    Snapshots(Vec<Snapshot>),
    Services(BTreeMap<String, ServiceInfo>),
    Instances(BTreeMap<String, Instance>),
    Mount(MountInfo),
    Mounts(Vec<MountInfo>),
    Strings(Vec<String>),
    Other(serde_json::Value),
}

impl Payload {
    /// Returns the shape tag of this payload.
    pub fn shape(&self) -> PayloadShape {
        use PayloadShape::*;
        match self {
            Payload::Volume(_) => Single(RecordKind::Volume),
            Payload::Volumes(_) => List(RecordKind::Volume),
            Payload::VolumeWithPath(_) => Single(RecordKind::VolumeWithPath),
            Payload::VolumesWithPath(_) => List(RecordKind::VolumeWithPath),
            Payload::Snapshot(_) => Single(RecordKind::Snapshot),
            Payload::Snapshots(_) => List(RecordKind::Snapshot),
            Payload::Services(_) => Map(RecordKind::Service),
            Payload::Instances(_) => Map(RecordKind::Instance),
            Payload::Mount(_) => Single(RecordKind::Mount),
            Payload::Mounts(_) => List(RecordKind::Mount),
            Payload::Strings(_) => Strings,
            Payload::Other(_) => Other,
        }
    }

    /// Converts a single record into a one-element list of the same kind.
    ///
    /// Returns `Err(self)` unchanged for every other shape.
    pub fn into_list(self) -> Result<Payload, Payload> {
        match self {
            Payload::Volume(v) => Ok(Payload::Volumes(vec![v])),
            Payload::VolumeWithPath(v) => Ok(Payload::VolumesWithPath(vec![v])),
            Payload::Snapshot(s) => Ok(Payload::Snapshots(vec![s])),
            Payload::Mount(m) => Ok(Payload::Mounts(vec![m])),
            other => Err(other),
        }
    }

    /// Wraps any serializable value as [`Payload::Other`].
    pub fn other<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Payload::Other(serde_json::to_value(value)?))
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Payload::Volume(v) => v.serialize(serializer),
            Payload::Volumes(v) => v.serialize(serializer),
            Payload::VolumeWithPath(v) => v.serialize(serializer),
            Payload::VolumesWithPath(v) => v.serialize(serializer),
            Payload::Snapshot(s) => s.serialize(serializer),
            Payload::Snapshots(s) => s.serialize(serializer),
            Payload::Services(s) => s.serialize(serializer),
            Payload::Instances(i) => i.serialize(serializer),
            Payload::Mount(m) => m.serialize(serializer),
            Payload::Mounts(m) => m.serialize(serializer),
            Payload::Strings(s) => s.serialize(serializer),
            Payload::Other(v) => v.serialize(serializer),
        }
    }
}

macro_rules! payload_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Payload {
                fn from(value: $ty) -> Self {
                    Payload::$variant(value)
                }
            }
        )*
    };
}

payload_from! {
    Volume => Volume,
    Vec<Volume> => Volumes,
    VolumeWithPath => VolumeWithPath,
    Vec<VolumeWithPath> => VolumesWithPath,
    Snapshot => Snapshot,
    Vec<Snapshot> => Snapshots,
    BTreeMap<String, ServiceInfo> => Services,
    BTreeMap<String, Instance> => Instances,
    MountInfo => Mount,
    Vec<MountInfo> => Mounts,
    Vec<String> => Strings,
    serde_json::Value => Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_records_normalize_to_lists() {
        let payload = Payload::from(Volume::new("v1", "a"));
        assert_eq!(payload.shape(), PayloadShape::Single(RecordKind::Volume));

        let list = payload.into_list().unwrap();
        assert_eq!(list.shape(), PayloadShape::List(RecordKind::Volume));
        assert_eq!(list, Payload::Volumes(vec![Volume::new("v1", "a")]));
    }

    #[test]
    fn lists_do_not_normalize() {
        let payload = Payload::Strings(vec!["a".into()]);
        let back = payload.clone().into_list().unwrap_err();
        assert_eq!(back, payload);
    }

    #[test]
    fn serializes_transparently() {
        let payload = Payload::Strings(vec!["x".into(), "y".into()]);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!(["x", "y"])
        );
    }

    #[test]
    fn map_payloads_have_map_shape() {
        let mut services = BTreeMap::new();
        services.insert("ebs".to_string(), ServiceInfo::default());
        assert_eq!(
            Payload::from(services).shape(),
            PayloadShape::Map(RecordKind::Service)
        );
    }
}
