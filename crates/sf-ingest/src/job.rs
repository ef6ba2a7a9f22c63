//! Generic Job Dispatcher
//!
//! A single topic carries `{eventType, payload, auth}` job requests for
//! transactional emails and audit-log writes. Routing is a table from event
//! type to handler closure, built once when the dispatcher is created; each
//! closure re-decodes the opaque payload into its typed struct and calls one
//! use-case method. A missing or `null` payload decodes to the zero value.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{self, BoxFuture, FutureExt, TryFutureExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use sf_common::{
    JobEnvelope, LogAction, LogPayload, MemberEmail, MerchantEmail, MerchantEmployeeEmail, MessageContext,
};
use tracing::{debug, warn};

use crate::decoder::{decode, decode_record};
use crate::error::IngestError;
use crate::handler::{record_outcome, Applied, MessageHandler};
use crate::reporter::FailureReporter;
use crate::usecase::{MemberUseCase, MerchantUseCase, ShippingUseCase};
use crate::Result;

const COMPONENT: &str = "job_dispatcher";
const NAME: &str = "job.generic";

// Merchant emails
pub const MERCHANT_REGISTRATION_EMAIL: &str = "merchant_registration_email";
pub const MERCHANT_APPROVAL_EMAIL: &str = "merchant_approval_email";
pub const MERCHANT_REJECTION_EMAIL: &str = "merchant_rejection_email";
pub const MERCHANT_FORGOT_PASSWORD_EMAIL: &str = "merchant_forgot_password_email";

// Merchant employee emails
pub const MERCHANT_EMPLOYEE_INVITATION_EMAIL: &str = "merchant_employee_invitation_email";
pub const MERCHANT_EMPLOYEE_FORGOT_PASSWORD_EMAIL: &str = "merchant_employee_forgot_password_email";

// Member emails
pub const MEMBER_REGISTRATION_EMAIL: &str = "member_registration_email";
pub const MEMBER_ACTIVATION_EMAIL: &str = "member_activation_email";
pub const MEMBER_VERIFICATION_EMAIL: &str = "member_verification_email";
pub const MEMBER_FORGOT_PASSWORD_EMAIL: &str = "member_forgot_password_email";
pub const MEMBER_CHANGE_PASSWORD_EMAIL: &str = "member_change_password_email";

// Audit logs
pub const MERCHANT_LOG_CREATE: &str = "merchant_log_create";
pub const MERCHANT_LOG_UPDATE: &str = "merchant_log_update";
pub const MERCHANT_LOG_DELETE: &str = "merchant_log_delete";
pub const MEMBER_LOG_CREATE: &str = "member_log_create";
pub const MEMBER_LOG_UPDATE: &str = "member_log_update";
pub const MEMBER_LOG_DELETE: &str = "member_log_delete";

// Shipping address logs
pub const SHIPPING_ADDRESS_LOG_CREATE: &str = "shipping_address_log_create";
pub const SHIPPING_ADDRESS_LOG_UPDATE: &str = "shipping_address_log_update";
pub const SHIPPING_ADDRESS_LOG_DELETE: &str = "shipping_address_log_delete";

type JobRoute = Box<dyn Fn(MessageContext, Value) -> BoxFuture<'static, Result<()>> + Send + Sync>;

pub struct JobDispatcher {
    routes: HashMap<&'static str, JobRoute>,
    reporter: Arc<FailureReporter>,
}

impl JobDispatcher {
    pub fn new(
        merchant: Arc<dyn MerchantUseCase>,
        member: Arc<dyn MemberUseCase>,
        shipping: Arc<dyn ShippingUseCase>,
        reporter: Arc<FailureReporter>,
    ) -> Self {
        let mut routes: HashMap<&'static str, JobRoute> = HashMap::new();

        routes.insert(
            MERCHANT_REGISTRATION_EMAIL,
            call(&merchant, MERCHANT_REGISTRATION_EMAIL, |uc, ctx, email: MerchantEmail| {
                uc.send_registration_email(ctx, email)
            }),
        );
        routes.insert(
            MERCHANT_APPROVAL_EMAIL,
            call(&merchant, MERCHANT_APPROVAL_EMAIL, |uc, ctx, email: MerchantEmail| {
                uc.send_approval_email(ctx, email)
            }),
        );
        routes.insert(
            MERCHANT_REJECTION_EMAIL,
            call(&merchant, MERCHANT_REJECTION_EMAIL, |uc, ctx, email: MerchantEmail| {
                uc.send_rejection_email(ctx, email)
            }),
        );
        routes.insert(
            MERCHANT_FORGOT_PASSWORD_EMAIL,
            call(&merchant, MERCHANT_FORGOT_PASSWORD_EMAIL, |uc, ctx, email: MerchantEmail| {
                uc.send_forgot_password_email(ctx, email)
            }),
        );
        routes.insert(
            MERCHANT_EMPLOYEE_INVITATION_EMAIL,
            call(&merchant, MERCHANT_EMPLOYEE_INVITATION_EMAIL, |uc, ctx, email: MerchantEmployeeEmail| {
                uc.send_employee_invitation_email(ctx, email)
            }),
        );
        routes.insert(
            MERCHANT_EMPLOYEE_FORGOT_PASSWORD_EMAIL,
            call(&merchant, MERCHANT_EMPLOYEE_FORGOT_PASSWORD_EMAIL, |uc, ctx, email: MerchantEmployeeEmail| {
                uc.send_employee_forgot_password_email(ctx, email)
            }),
        );

        routes.insert(
            MEMBER_REGISTRATION_EMAIL,
            call(&member, MEMBER_REGISTRATION_EMAIL, |uc, ctx, email: MemberEmail| {
                uc.send_registration_email(ctx, email)
            }),
        );
        routes.insert(
            MEMBER_ACTIVATION_EMAIL,
            call(&member, MEMBER_ACTIVATION_EMAIL, |uc, ctx, email: MemberEmail| {
                uc.send_activation_email(ctx, email)
            }),
        );
        routes.insert(
            MEMBER_VERIFICATION_EMAIL,
            call(&member, MEMBER_VERIFICATION_EMAIL, |uc, ctx, email: MemberEmail| {
                uc.send_verification_email(ctx, email)
            }),
        );
        routes.insert(
            MEMBER_FORGOT_PASSWORD_EMAIL,
            call(&member, MEMBER_FORGOT_PASSWORD_EMAIL, |uc, ctx, email: MemberEmail| {
                uc.send_forgot_password_email(ctx, email)
            }),
        );
        routes.insert(
            MEMBER_CHANGE_PASSWORD_EMAIL,
            call(&member, MEMBER_CHANGE_PASSWORD_EMAIL, |uc, ctx, email: MemberEmail| {
                uc.send_change_password_email(ctx, email)
            }),
        );

        for (event_type, action) in [
            (MERCHANT_LOG_CREATE, LogAction::Create),
            (MERCHANT_LOG_UPDATE, LogAction::Update),
            (MERCHANT_LOG_DELETE, LogAction::Delete),
        ] {
            routes.insert(
                event_type,
                call(&merchant, event_type, move |uc, ctx, log: LogPayload| {
                    uc.insert_log(ctx, log.before, log.after, action)
                }),
            );
        }

        for (event_type, action) in [
            (MEMBER_LOG_CREATE, LogAction::Create),
            (MEMBER_LOG_UPDATE, LogAction::Update),
            (MEMBER_LOG_DELETE, LogAction::Delete),
        ] {
            routes.insert(
                event_type,
                call(&member, event_type, move |uc, ctx, log: LogPayload| {
                    uc.insert_log(ctx, log.before, log.after, action)
                }),
            );
        }

        for (event_type, action) in [
            (SHIPPING_ADDRESS_LOG_CREATE, LogAction::Create),
            (SHIPPING_ADDRESS_LOG_UPDATE, LogAction::Update),
            (SHIPPING_ADDRESS_LOG_DELETE, LogAction::Delete),
        ] {
            routes.insert(
                event_type,
                call(&shipping, event_type, move |uc, ctx, log: LogPayload| {
                    uc.insert_log(ctx, log.before, log.after, action)
                }),
            );
        }

        Self { routes, reporter }
    }

    /// Registered event types, sorted.
    pub fn event_types(&self) -> Vec<&'static str> {
        let mut event_types: Vec<_> = self.routes.keys().copied().collect();
        event_types.sort_unstable();
        event_types
    }

    /// Decode and route one job. Errors are returned without alerting;
    /// [`MessageHandler::handle`] adds the log and alert.
    pub async fn dispatch(&self, ctx: &MessageContext, raw: &[u8]) -> Result<Applied> {
        let envelope: JobEnvelope = decode(raw, COMPONENT, "job")?;
        self.route(ctx, envelope).await
    }

    async fn route(&self, ctx: &MessageContext, envelope: JobEnvelope) -> Result<Applied> {
        let JobEnvelope {
            event_type,
            payload,
            auth,
        } = envelope;

        let Some(route) = self.routes.get(event_type.as_str()) else {
            warn!(
                event_type = %event_type,
                message_id = %ctx.message_id(),
                "Ignoring job with unknown event type"
            );
            return Ok(Applied::Ignored);
        };

        debug!(event_type = %event_type, message_id = %ctx.message_id(), "Dispatching job");
        let ctx = ctx.clone().with_auth(auth);
        route(ctx, payload).await?;
        Ok(Applied::Dispatched)
    }

    /// Decode errors were logged by the decoder; everything gets an alert.
    async fn report(&self, ctx: &MessageContext, event_type: &str, raw: &[u8], err: &IngestError) {
        if !err.is_decode() {
            self.reporter.send_error_log(ctx, COMPONENT, event_type, err, raw);
        }
        self.reporter.send_notification(event_type, raw, COMPONENT, err).await;
    }
}

#[async_trait]
impl MessageHandler for JobDispatcher {
    fn name(&self) -> &str {
        NAME
    }

    async fn handle(&self, ctx: &MessageContext, raw: &[u8]) -> Result<()> {
        let (event_type, result) = match decode::<JobEnvelope>(raw, COMPONENT, "job") {
            Ok(envelope) => {
                let event_type = envelope.event_type.clone();
                (event_type, self.route(ctx, envelope).await)
            }
            Err(err) => (String::new(), Err(err)),
        };

        if let Err(err) = &result {
            self.report(ctx, &event_type, raw, err).await;
        }
        record_outcome(NAME, &result);
        result.map(|_| ())
    }
}

// ============================================================================
// Route construction
// ============================================================================

/// Route that decodes the payload into `P` and hands it to a use-case method.
fn call<U, P, F>(use_case: &Arc<U>, event_type: &'static str, method: F) -> JobRoute
where
    U: ?Sized + Send + Sync + 'static,
    P: DeserializeOwned + Default + Send + 'static,
    F: for<'a> Fn(&'a U, &'a MessageContext, P) -> BoxFuture<'a, anyhow::Result<()>> + Send + Sync + 'static,
{
    let use_case = Arc::clone(use_case);
    let method = Arc::new(method);
    typed(event_type, move |ctx, payload: P| {
        let use_case = Arc::clone(&use_case);
        let method = Arc::clone(&method);
        async move { method(use_case.as_ref(), &ctx, payload).await }
    })
}

fn typed<P, F, Fut>(event_type: &'static str, handler: F) -> JobRoute
where
    P: DeserializeOwned + Default + Send + 'static,
    F: Fn(MessageContext, P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Box::new(
        move |ctx: MessageContext, payload: Value| -> BoxFuture<'static, Result<()>> {
            match decode_record::<P>(Some(payload), COMPONENT, event_type) {
                Ok(payload) => handler(ctx, payload).map_err(IngestError::UseCase).boxed(),
                Err(err) => future::ready(Err(err)).boxed(),
            }
        },
    )
}
