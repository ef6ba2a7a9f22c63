//! Message Envelopes
//!
//! Outer JSON wrappers carrying routing metadata (`op` or `eventType`)
//! plus the entity or job payload.

use serde::{Deserialize, Serialize};

// ============================================================================
// Write intent
// ============================================================================

/// The three write intents a change message can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteOp {
    Create,
    Update,
    Delete,
}

impl WriteOp {
    /// Map a change-capture op code. Anything but `c`, `u`, `d` has no
    /// defined behavior and yields `None`.
    pub fn from_cdc_code(op: &str) -> Option<Self> {
        match op {
            "c" => Some(Self::Create),
            "u" => Some(Self::Update),
            "d" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

// ============================================================================
// CDC envelope
// ============================================================================

/// `{"payload": {"before": ..., "after": ..., "op": "c"|"u"|"d"}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdcEnvelope<R> {
    pub payload: CdcPayload<R>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdcPayload<R> {
    pub before: Option<R>,
    pub after: Option<R>,
    #[serde(default)]
    pub op: String,
}

// ============================================================================
// Non-CDC envelopes
// ============================================================================

/// `{"eventType": "...", "payload": {...flat...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope<R> {
    #[serde(default)]
    pub event_type: String,
    pub payload: Option<R>,
}

/// `{"eventType": "...", "payload": <opaque>, "auth": "<token>"}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobEnvelope {
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(default)]
    pub auth: String,
}
