//! Reading payloads from JSON.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::de::DeserializeOwned;
use serde_json::Value;
use stowage_render::Payload;

/// Record kind of the input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Volumes,
    VolumesWithPath,
    Snapshots,
    Services,
    Instances,
    Mounts,
    Strings,
    Object,
}

/// Reads JSON from `path`, or stdin when `path` is `None` or `-`.
pub fn read_payload(kind: Kind, path: Option<&Path>) -> Result<Payload> {
    let source = match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("cannot read stdin")?;
            buf
        }
    };
    let value: Value = serde_json::from_str(&source).context("input is not valid JSON")?;
    to_payload(kind, value).with_context(|| format!("input does not hold {:?}", kind))
}

/// Converts a JSON document into the payload for `kind`.
///
/// List kinds also accept a single object, which becomes a single-record
/// payload.
pub fn to_payload(kind: Kind, value: Value) -> Result<Payload, serde_json::Error> {
    let single = value.is_object();
    Ok(match kind {
        Kind::Volumes if single => Payload::Volume(decode(value)?),
        Kind::Volumes => Payload::Volumes(decode(value)?),
        Kind::VolumesWithPath if single => Payload::VolumeWithPath(decode(value)?),
        Kind::VolumesWithPath => Payload::VolumesWithPath(decode(value)?),
        Kind::Snapshots if single => Payload::Snapshot(decode(value)?),
        Kind::Snapshots => Payload::Snapshots(decode(value)?),
        Kind::Mounts if single => Payload::Mount(decode(value)?),
        Kind::Mounts => Payload::Mounts(decode(value)?),
        Kind::Services => Payload::Services(decode(value)?),
        Kind::Instances => Payload::Instances(decode(value)?),
        Kind::Strings => Payload::Strings(decode(value)?),
        Kind::Object => Payload::Other(value),
    })
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stowage_render::{PayloadShape, RecordKind};

    #[test]
    fn list_and_single_volumes() {
        let list = to_payload(Kind::Volumes, json!([{"id": "v1", "name": "a"}])).unwrap();
        assert_eq!(list.shape(), PayloadShape::List(RecordKind::Volume));

        let single = to_payload(Kind::Volumes, json!({"id": "v1", "name": "a"})).unwrap();
        assert_eq!(single.shape(), PayloadShape::Single(RecordKind::Volume));
    }

    #[test]
    fn services_are_keyed() {
        let payload = to_payload(
            Kind::Services,
            json!({"ebs": {"name": "ebs", "driver": {"name": "ebs", "type": "block"}}}),
        )
        .unwrap();
        match payload {
            Payload::Services(services) => assert_eq!(services["ebs"].driver.driver_type, "block"),
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn wrong_shape_is_rejected() {
        assert!(to_payload(Kind::Strings, json!([1, 2])).is_err());
        assert!(to_payload(Kind::Services, json!(["a"])).is_err());
    }

    #[test]
    fn object_passes_through() {
        let payload = to_payload(Kind::Object, json!({"anything": [1, 2]})).unwrap();
        assert_eq!(payload.shape(), PayloadShape::Other);
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mounts.json");
        fs::write(&path, r#"[{"id": 1, "source": "/dev/sda", "mountPoint": "/"}]"#).unwrap();

        let payload = read_payload(Kind::Mounts, Some(&path)).unwrap();
        match payload {
            Payload::Mounts(mounts) => assert_eq!(mounts[0].mount_point, "/"),
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_payload(Kind::Volumes, Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
