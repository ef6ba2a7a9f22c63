//! Shared test doubles for the router integration tests.

#![allow(dead_code)]

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;

use sf_common::{
    LogAction, MemberEmail, MemberPassword, MerchantEmail, MerchantEmployeeEmail, MessageContext,
};
use sf_ingest::{
    Alert, FailureReporter, MemberRepository, MemberUseCase, MerchantUseCase, Notifier, Repository,
    ShippingUseCase,
};

// ============================================================================
// Repositories
// ============================================================================

/// Records every write; fails every call when `failing` is set.
pub struct RecordingRepository<E> {
    calls: Mutex<Vec<(&'static str, E)>>,
    failing: Option<String>,
}

impl<E: Clone> RecordingRepository<E> {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: Some(message.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<(&'static str, E)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(&self, method: &'static str, entity: &E) -> anyhow::Result<()> {
        self.calls.lock().push((method, entity.clone()));
        match &self.failing {
            Some(message) => Err(anyhow::anyhow!(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<E: Clone + Send + Sync> Repository<E> for RecordingRepository<E> {
    async fn save(&self, _ctx: &MessageContext, entity: &E) -> anyhow::Result<()> {
        self.record("save", entity)
    }

    async fn update(&self, _ctx: &MessageContext, entity: &E) -> anyhow::Result<()> {
        self.record("update", entity)
    }

    async fn delete(&self, _ctx: &MessageContext, entity: &E) -> anyhow::Result<()> {
        self.record("delete", entity)
    }
}

pub struct RecordingMembers {
    calls: Mutex<Vec<MemberPassword>>,
    failing: bool,
}

impl RecordingMembers {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn calls(&self) -> Vec<MemberPassword> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl MemberRepository for RecordingMembers {
    async fn update_password_member_by_email(
        &self,
        _ctx: &MessageContext,
        password: MemberPassword,
    ) -> anyhow::Result<()> {
        self.calls.lock().push(password);
        if self.failing {
            anyhow::bail!("member store unavailable");
        }
        Ok(())
    }
}

// ============================================================================
// Use cases
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct UseCaseCall {
    pub method: String,
    pub payload: Value,
    pub auth: Option<String>,
}

/// Implements every use-case trait, recording `(method, payload, auth)`.
#[derive(Default)]
pub struct RecordingUseCases {
    calls: Mutex<Vec<UseCaseCall>>,
    failing: Option<String>,
}

impl RecordingUseCases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: Some(message.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<UseCaseCall> {
        self.calls.lock().clone()
    }

    fn record(&self, method: &str, ctx: &MessageContext, payload: impl Serialize) -> anyhow::Result<()> {
        self.calls.lock().push(UseCaseCall {
            method: method.to_string(),
            payload: serde_json::to_value(payload)?,
            auth: ctx.auth().map(str::to_string),
        });
        match &self.failing {
            Some(message) => Err(anyhow::anyhow!(message.clone())),
            None => Ok(()),
        }
    }

    fn record_log(
        &self,
        method: &str,
        ctx: &MessageContext,
        before: Value,
        after: Value,
        action: LogAction,
    ) -> anyhow::Result<()> {
        self.record(
            method,
            ctx,
            serde_json::json!({ "before": before, "after": after, "action": action }),
        )
    }
}

#[async_trait]
impl MerchantUseCase for RecordingUseCases {
    async fn send_registration_email(&self, ctx: &MessageContext, email: MerchantEmail) -> anyhow::Result<()> {
        self.record("merchant.send_registration_email", ctx, email)
    }

    async fn send_approval_email(&self, ctx: &MessageContext, email: MerchantEmail) -> anyhow::Result<()> {
        self.record("merchant.send_approval_email", ctx, email)
    }

    async fn send_rejection_email(&self, ctx: &MessageContext, email: MerchantEmail) -> anyhow::Result<()> {
        self.record("merchant.send_rejection_email", ctx, email)
    }

    async fn send_forgot_password_email(&self, ctx: &MessageContext, email: MerchantEmail) -> anyhow::Result<()> {
        self.record("merchant.send_forgot_password_email", ctx, email)
    }

    async fn send_employee_invitation_email(
        &self,
        ctx: &MessageContext,
        email: MerchantEmployeeEmail,
    ) -> anyhow::Result<()> {
        self.record("merchant.send_employee_invitation_email", ctx, email)
    }

    async fn send_employee_forgot_password_email(
        &self,
        ctx: &MessageContext,
        email: MerchantEmployeeEmail,
    ) -> anyhow::Result<()> {
        self.record("merchant.send_employee_forgot_password_email", ctx, email)
    }

    async fn insert_log(&self, ctx: &MessageContext, before: Value, after: Value, action: LogAction) -> anyhow::Result<()> {
        self.record_log("merchant.insert_log", ctx, before, after, action)
    }
}

#[async_trait]
impl MemberUseCase for RecordingUseCases {
    async fn send_registration_email(&self, ctx: &MessageContext, email: MemberEmail) -> anyhow::Result<()> {
        self.record("member.send_registration_email", ctx, email)
    }

    async fn send_activation_email(&self, ctx: &MessageContext, email: MemberEmail) -> anyhow::Result<()> {
        self.record("member.send_activation_email", ctx, email)
    }

    async fn send_verification_email(&self, ctx: &MessageContext, email: MemberEmail) -> anyhow::Result<()> {
        self.record("member.send_verification_email", ctx, email)
    }

    async fn send_forgot_password_email(&self, ctx: &MessageContext, email: MemberEmail) -> anyhow::Result<()> {
        self.record("member.send_forgot_password_email", ctx, email)
    }

    async fn send_change_password_email(&self, ctx: &MessageContext, email: MemberEmail) -> anyhow::Result<()> {
        self.record("member.send_change_password_email", ctx, email)
    }

    async fn insert_log(&self, ctx: &MessageContext, before: Value, after: Value, action: LogAction) -> anyhow::Result<()> {
        self.record_log("member.insert_log", ctx, before, after, action)
    }
}

#[async_trait]
impl ShippingUseCase for RecordingUseCases {
    async fn insert_log(&self, ctx: &MessageContext, before: Value, after: Value, action: LogAction) -> anyhow::Result<()> {
        self.record_log("shipping.insert_log", ctx, before, after, action)
    }
}

// ============================================================================
// Alerts
// ============================================================================

#[derive(Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<Alert>>,
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, alert: &Alert) -> anyhow::Result<()> {
        self.alerts.lock().push(alert.clone());
        Ok(())
    }
}

pub fn reporter() -> (Arc<FailureReporter>, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let reporter = Arc::new(FailureReporter::new(notifier.clone()));
    (reporter, notifier)
}

// ============================================================================
// Log capture
// ============================================================================

/// In-memory sink for a scoped fmt subscriber.
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Install a WARN+ subscriber for the current thread until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .without_time()
            .with_writer(move || sink.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    pub fn count(&self, level: &str) -> usize {
        self.contents()
            .lines()
            .filter(|line| line.trim_start().starts_with(level))
            .count()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
