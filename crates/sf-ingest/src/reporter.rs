//! Failure Reporter
//!
//! Uniform error reporting for the routers: a structured error log at the
//! point of failure and, for jobs, an out-of-band alert.

use std::sync::Arc;

use chrono::Utc;
use sf_common::MessageContext;
use tracing::{error, warn};

use crate::error::IngestError;
use crate::notifier::{Alert, Notifier};

#[derive(Clone)]
pub struct FailureReporter {
    notifier: Arc<dyn Notifier>,
}

impl FailureReporter {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Structured error log tagged with where the failure happened.
    pub fn send_error_log(
        &self,
        ctx: &MessageContext,
        component: &str,
        scope: &str,
        err: &IngestError,
        payload: &[u8],
    ) {
        error!(
            component,
            scope,
            message_id = %ctx.message_id(),
            error = %err,
            payload = %String::from_utf8_lossy(payload),
            "Message handling failed"
        );
    }

    /// Raise an operator alert. Transport failures are logged, never propagated.
    pub async fn send_notification(
        &self,
        event_type: &str,
        payload: &[u8],
        component: &str,
        err: &IngestError,
    ) {
        let alert = Alert {
            component: component.to_string(),
            event_type: event_type.to_string(),
            payload: String::from_utf8_lossy(payload).into_owned(),
            error: err.to_string(),
            occurred_at: Utc::now(),
        };

        if let Err(e) = self.notifier.notify(&alert).await {
            warn!(
                component,
                event_type,
                error = %e,
                "Failed to deliver alert"
            );
        }
    }
}
