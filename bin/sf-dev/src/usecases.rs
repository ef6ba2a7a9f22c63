//! Use cases that only log what they would have done.

use async_trait::async_trait;
use serde_json::Value;
use sf_common::{LogAction, MemberEmail, MerchantEmail, MerchantEmployeeEmail, MessageContext};
use sf_ingest::{MemberUseCase, MerchantUseCase, ShippingUseCase};
use tracing::info;

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingUseCases;

fn email(ctx: &MessageContext, kind: &str, to: &str) {
    info!(
        message_id = %ctx.message_id(),
        authenticated = ctx.auth().is_some(),
        kind,
        to,
        "Would send email"
    );
}

fn audit(ctx: &MessageContext, family: &str, before: &Value, after: &Value, action: LogAction) {
    info!(
        message_id = %ctx.message_id(),
        family,
        action = %action,
        before = %before,
        after = %after,
        "Would insert audit log"
    );
}

#[async_trait]
impl MerchantUseCase for LoggingUseCases {
    async fn send_registration_email(&self, ctx: &MessageContext, mail: MerchantEmail) -> anyhow::Result<()> {
        email(ctx, "merchant_registration", &mail.email);
        Ok(())
    }

    async fn send_approval_email(&self, ctx: &MessageContext, mail: MerchantEmail) -> anyhow::Result<()> {
        email(ctx, "merchant_approval", &mail.email);
        Ok(())
    }

    async fn send_rejection_email(&self, ctx: &MessageContext, mail: MerchantEmail) -> anyhow::Result<()> {
        email(ctx, "merchant_rejection", &mail.email);
        Ok(())
    }

    async fn send_forgot_password_email(&self, ctx: &MessageContext, mail: MerchantEmail) -> anyhow::Result<()> {
        email(ctx, "merchant_forgot_password", &mail.email);
        Ok(())
    }

    async fn send_employee_invitation_email(
        &self,
        ctx: &MessageContext,
        mail: MerchantEmployeeEmail,
    ) -> anyhow::Result<()> {
        email(ctx, "merchant_employee_invitation", &mail.email);
        Ok(())
    }

    async fn send_employee_forgot_password_email(
        &self,
        ctx: &MessageContext,
        mail: MerchantEmployeeEmail,
    ) -> anyhow::Result<()> {
        email(ctx, "merchant_employee_forgot_password", &mail.email);
        Ok(())
    }

    async fn insert_log(&self, ctx: &MessageContext, before: Value, after: Value, action: LogAction) -> anyhow::Result<()> {
        audit(ctx, "merchant", &before, &after, action);
        Ok(())
    }
}

#[async_trait]
impl MemberUseCase for LoggingUseCases {
    async fn send_registration_email(&self, ctx: &MessageContext, mail: MemberEmail) -> anyhow::Result<()> {
        email(ctx, "member_registration", &mail.email);
        Ok(())
    }

    async fn send_activation_email(&self, ctx: &MessageContext, mail: MemberEmail) -> anyhow::Result<()> {
        email(ctx, "member_activation", &mail.email);
        Ok(())
    }

    async fn send_verification_email(&self, ctx: &MessageContext, mail: MemberEmail) -> anyhow::Result<()> {
        email(ctx, "member_verification", &mail.email);
        Ok(())
    }

    async fn send_forgot_password_email(&self, ctx: &MessageContext, mail: MemberEmail) -> anyhow::Result<()> {
        email(ctx, "member_forgot_password", &mail.email);
        Ok(())
    }

    async fn send_change_password_email(&self, ctx: &MessageContext, mail: MemberEmail) -> anyhow::Result<()> {
        email(ctx, "member_change_password", &mail.email);
        Ok(())
    }

    async fn insert_log(&self, ctx: &MessageContext, before: Value, after: Value, action: LogAction) -> anyhow::Result<()> {
        audit(ctx, "member", &before, &after, action);
        Ok(())
    }
}

#[async_trait]
impl ShippingUseCase for LoggingUseCases {
    async fn insert_log(&self, ctx: &MessageContext, before: Value, after: Value, action: LogAction) -> anyhow::Result<()> {
        audit(ctx, "shipping_address", &before, &after, action);
        Ok(())
    }
}
