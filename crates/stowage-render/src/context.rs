//! Values visible to templates.
//!
//! Every document is rendered against the same three top-level names:
//!
//! - `config`: the [`RenderConfig`] in effect
//! - `client`: the active storage client, as a [`ClientHandle`] object
//! - `data`: the payload
//!
//! Custom formats receive the same names as macro arguments, so
//! `{{ client.name }}: {{ data | length }} volumes` works as a format.

use std::sync::Arc;

use minijinja::value::{Enumerator, Object};
use minijinja::{context, Error, ErrorKind, State, Value};

use crate::client::VolumeClient;
use crate::config::RenderConfig;
use crate::model::Volume;
use crate::payload::Payload;

/// Template-side view of a [`VolumeClient`].
///
/// Exposes the attribute `name` and the method `volume_status(volume)`.
#[derive(Debug)]
pub struct ClientHandle {
    client: Arc<dyn VolumeClient>,
}

impl ClientHandle {
    pub fn new(client: Arc<dyn VolumeClient>) -> Self {
        Self { client }
    }
}

impl Object for ClientHandle {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        match key.as_str()? {
            "name" => Some(Value::from(self.client.name())),
            _ => None,
        }
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Str(&["name"])
    }

    fn call_method(
        self: &Arc<Self>,
        _state: &State,
        name: &str,
        args: &[Value],
    ) -> Result<Value, Error> {
        match name {
            "volume_status" => {
                let volume = args.first().ok_or_else(|| {
                    Error::new(
                        ErrorKind::MissingArgument,
                        "volume_status() requires a volume argument",
                    )
                })?;
                volume_status(self.client.as_ref(), volume)
            }
            _ => Err(Error::new(
                ErrorKind::UnknownMethod,
                format!("client has no method named {}", name),
            )),
        }
    }
}

/// Resolves the status of a template value that holds a volume record.
///
/// Any record with volume fields works, including volumes with a path.
pub(crate) fn volume_status(client: &dyn VolumeClient, value: &Value) -> Result<Value, Error> {
    let volume: Volume = serde_json::to_value(value)
        .and_then(serde_json::from_value)
        .map_err(|e| {
            Error::new(
                ErrorKind::InvalidOperation,
                format!("volume_status() expects a volume, got {}", value.kind()),
            )
            .with_source(e)
        })?;

    client
        .volume_status(&volume)
        .map(Value::from)
        .map_err(|e| Error::new(ErrorKind::InvalidOperation, e.to_string()).with_source(e))
}

/// Builds the root context for a render call.
pub fn template_context(
    config: &RenderConfig,
    client: &Arc<dyn VolumeClient>,
    payload: &Payload,
) -> Value {
    context! {
        config => Value::from_serialize(config),
        client => Value::from_object(ClientHandle::new(Arc::clone(client))),
        data => Value::from_serialize(payload),
    }
}
