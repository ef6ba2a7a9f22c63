//! Envelope Decoder
//!
//! Every entrypoint decodes through here so a malformed message produces
//! exactly one structured error log at its origin.

use serde::de::DeserializeOwned;
use tracing::error;

use crate::error::IngestError;
use crate::Result;

/// Deserialize `raw` into `T`.
///
/// On failure logs `(component, scope, error, into, payload)` and returns
/// [`IngestError::Decode`] wrapping the serde error unchanged.
pub fn decode<T: DeserializeOwned>(raw: &[u8], component: &'static str, scope: &str) -> Result<T> {
    serde_json::from_slice(raw).map_err(|source| {
        error!(
            component,
            scope,
            error = %source,
            into = std::any::type_name::<T>(),
            payload = %String::from_utf8_lossy(raw),
            "Failed to decode message"
        );
        IngestError::Decode {
            component,
            scope: scope.to_string(),
            source,
        }
    })
}

/// Re-decode an already-parsed JSON value into `T`, with the same logging as [`decode`].
pub fn decode_value<T: DeserializeOwned>(
    value: serde_json::Value,
    component: &'static str,
    scope: &str,
) -> Result<T> {
    let rendered = value.to_string();
    serde_json::from_value(value).map_err(|source| {
        error!(
            component,
            scope,
            error = %source,
            into = std::any::type_name::<T>(),
            payload = %rendered,
            "Failed to decode payload"
        );
        IngestError::Decode {
            component,
            scope: scope.to_string(),
            source,
        }
    })
}

/// Decode an optional row image. Absent or `null` becomes the zero value.
pub fn decode_record<T: DeserializeOwned + Default>(
    value: Option<serde_json::Value>,
    component: &'static str,
    scope: &str,
) -> Result<T> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(T::default()),
        Some(value) => decode_value(value, component, scope),
    }
}
