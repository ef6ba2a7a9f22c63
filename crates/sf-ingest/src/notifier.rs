//! Alert Notifiers
//!
//! Out-of-band transport for operator alerts raised on failed jobs.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Operator-facing alert with enough context to triage and replay a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub component: String,
    pub event_type: String,
    /// Raw message as received, for replay.
    pub payload: String,
    pub error: String,
    pub occurred_at: DateTime<Utc>,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, alert: &Alert) -> anyhow::Result<()>;
}

// ============================================================================
// Webhook
// ============================================================================

#[derive(Debug, Clone)]
pub struct WebhookNotifierConfig {
    pub url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl WebhookNotifierConfig {
    pub fn new(url: impl Into<String>, request_timeout: Duration) -> Self {
        Self {
            url: url.into(),
            connect_timeout: request_timeout.min(Duration::from_secs(5)),
            request_timeout,
        }
    }
}

/// Posts alerts as JSON to a webhook.
pub struct WebhookNotifier {
    config: WebhookNotifierConfig,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(config: WebhookNotifierConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, alert: &Alert) -> anyhow::Result<()> {
        debug!(url = %self.config.url, event_type = %alert.event_type, "Sending alert");

        let response = self.client.post(&self.config.url).json(alert).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("alert webhook returned {}: {}", status, body);
        }
        Ok(())
    }
}

// ============================================================================
// Log only
// ============================================================================

/// Fallback when no webhook is configured: the alert becomes a warn-level log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, alert: &Alert) -> anyhow::Result<()> {
        warn!(
            component = %alert.component,
            event_type = %alert.event_type,
            error = %alert.error,
            payload = %alert.payload,
            "Alert raised"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_wire_format() {
        let alert = Alert {
            component: "job_dispatcher".to_string(),
            event_type: "member_activation_email".to_string(),
            payload: "{}".to_string(),
            error: "smtp down".to_string(),
            occurred_at: Utc::now(),
        };
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["eventType"], "member_activation_email");
        assert_eq!(json["error"], "smtp down");
        assert!(json.get("occurredAt").is_some());
    }

    #[test]
    fn test_webhook_config_caps_connect_timeout() {
        let config = WebhookNotifierConfig::new("http://hooks.local", Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));

        let config = WebhookNotifierConfig::new("http://hooks.local", Duration::from_secs(2));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_log_notifier_never_fails() {
        let alert = Alert {
            component: "job_dispatcher".to_string(),
            event_type: String::new(),
            payload: "garbage".to_string(),
            error: "decode".to_string(),
            occurred_at: Utc::now(),
        };
        assert!(LogNotifier.notify(&alert).await.is_ok());
    }
}
