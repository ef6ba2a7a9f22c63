//! Message handler seam between the broker harness and the routers.

use async_trait::async_trait;
use sf_common::MessageContext;

use crate::Result;

/// Entrypoint for one topic. `Ok` means ack; `Err` has already been logged
/// (and alerted, for jobs) and is returned for the harness to act on.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    fn name(&self) -> &str;
    async fn handle(&self, ctx: &MessageContext, raw: &[u8]) -> Result<()>;
}

/// What a router did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Saved,
    Updated,
    Deleted,
    Dispatched,
    /// Unknown op or event type; nothing was called.
    Ignored,
}

impl Applied {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}

/// Count a handled message under `ingest_messages_total{handler, outcome}`.
pub(crate) fn record_outcome(handler: &str, result: &Result<Applied>) {
    let outcome = match result {
        Ok(Applied::Ignored) => "ignored",
        Ok(_) => "ok",
        Err(_) => "error",
    };
    metrics::counter!(
        "ingest_messages_total",
        "handler" => handler.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}
