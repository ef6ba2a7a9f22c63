//! Use-case collaborators invoked by the job dispatcher.

use async_trait::async_trait;
use serde_json::Value;
use sf_common::{LogAction, MemberEmail, MerchantEmail, MerchantEmployeeEmail, MessageContext};

#[async_trait]
pub trait MerchantUseCase: Send + Sync {
    async fn send_registration_email(&self, ctx: &MessageContext, email: MerchantEmail) -> anyhow::Result<()>;
    async fn send_approval_email(&self, ctx: &MessageContext, email: MerchantEmail) -> anyhow::Result<()>;
    async fn send_rejection_email(&self, ctx: &MessageContext, email: MerchantEmail) -> anyhow::Result<()>;
    async fn send_forgot_password_email(&self, ctx: &MessageContext, email: MerchantEmail) -> anyhow::Result<()>;

    async fn send_employee_invitation_email(
        &self,
        ctx: &MessageContext,
        email: MerchantEmployeeEmail,
    ) -> anyhow::Result<()>;
    async fn send_employee_forgot_password_email(
        &self,
        ctx: &MessageContext,
        email: MerchantEmployeeEmail,
    ) -> anyhow::Result<()>;

    async fn insert_log(&self, ctx: &MessageContext, before: Value, after: Value, action: LogAction) -> anyhow::Result<()>;
}

#[async_trait]
pub trait MemberUseCase: Send + Sync {
    async fn send_registration_email(&self, ctx: &MessageContext, email: MemberEmail) -> anyhow::Result<()>;
    async fn send_activation_email(&self, ctx: &MessageContext, email: MemberEmail) -> anyhow::Result<()>;
    async fn send_verification_email(&self, ctx: &MessageContext, email: MemberEmail) -> anyhow::Result<()>;
    async fn send_forgot_password_email(&self, ctx: &MessageContext, email: MemberEmail) -> anyhow::Result<()>;
    async fn send_change_password_email(&self, ctx: &MessageContext, email: MemberEmail) -> anyhow::Result<()>;

    async fn insert_log(&self, ctx: &MessageContext, before: Value, after: Value, action: LogAction) -> anyhow::Result<()>;
}

/// Shipping-address audit trail.
#[async_trait]
pub trait ShippingUseCase: Send + Sync {
    async fn insert_log(&self, ctx: &MessageContext, before: Value, after: Value, action: LogAction) -> anyhow::Result<()>;
}
