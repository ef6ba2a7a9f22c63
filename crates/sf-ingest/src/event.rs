//! Non-CDC Event Router
//!
//! Application-emitted `{eventType, payload}` messages with the same
//! create/update/delete intent as change capture, keyed on per-entity event
//! type literals. An optional post-write hook runs after successful creates
//! and updates; contacts use it to mirror credentials into the member store.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use sf_common::{Contact, Entity, EventEnvelope, MessageContext, WriteOp};
use tracing::{debug, warn};

use crate::decoder::{decode, decode_record};
use crate::error::IngestError;
use crate::handler::{record_outcome, Applied, MessageHandler};
use crate::reporter::FailureReporter;
use crate::repository::{MemberRepository, Repository, WriteHook};
use crate::Result;

const COMPONENT: &str = "event_router";

// ============================================================================
// Event type literals
// ============================================================================

/// Event type literals one entity responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventTypes {
    pub create: &'static str,
    pub update: &'static str,
    pub delete: &'static str,
}

impl EventTypes {
    pub fn classify(&self, event_type: &str) -> Option<WriteOp> {
        if event_type == self.create {
            Some(WriteOp::Create)
        } else if event_type == self.update {
            Some(WriteOp::Update)
        } else if event_type == self.delete {
            Some(WriteOp::Delete)
        } else {
            None
        }
    }
}

macro_rules! event_types {
    ($($name:ident => $prefix:literal),* $(,)?) => {
        $(
            pub const $name: EventTypes = EventTypes {
                create: concat!($prefix, "_CREATED"),
                update: concat!($prefix, "_UPDATED"),
                delete: concat!($prefix, "_DELETED"),
            };
        )*
    };
}

event_types! {
    ACCOUNT_EVENTS => "ACCOUNT",
    CONTACT_EVENTS => "CONTACT",
    ADDRESS_EVENTS => "ADDRESS",
    PHONE_EVENTS => "PHONE",
    DOCUMENT_EVENTS => "DOCUMENT",
    CONTACT_NPWP_EVENTS => "CONTACT_NPWP",
    CONTACT_ADDRESS_EVENTS => "CONTACT_ADDRESS",
    CONTACT_DOCUMENT_EVENTS => "CONTACT_DOCUMENT",
}

// ============================================================================
// Handler
// ============================================================================

pub struct EventHandler<E: Entity> {
    name: String,
    events: EventTypes,
    repo: Arc<dyn Repository<E>>,
    hook: Option<Arc<dyn WriteHook<E>>>,
    reporter: Arc<FailureReporter>,
}

impl<E: Entity> EventHandler<E> {
    pub fn new(events: EventTypes, repo: Arc<dyn Repository<E>>, reporter: Arc<FailureReporter>) -> Self {
        Self {
            name: format!("event.{}", E::KIND),
            events,
            repo,
            hook: None,
            reporter,
        }
    }

    pub fn with_hook(mut self, hook: Arc<dyn WriteHook<E>>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Decode and apply one event message. The payload is only typed once
    /// the event type is known.
    pub async fn apply(&self, ctx: &MessageContext, raw: &[u8]) -> Result<Applied> {
        let envelope: EventEnvelope<Value> = decode(raw, COMPONENT, E::KIND)?;
        let op = self.events.classify(&envelope.event_type);
        let record = match op {
            Some(_) => decode_record::<E::Record>(envelope.payload, COMPONENT, E::KIND)?,
            None => E::Record::default(),
        };

        let applied = match op {
            Some(WriteOp::Create) => {
                let entity = E::restructure(record);
                debug!(kind = E::KIND, key = %entity.key(), event_type = %envelope.event_type, "Saving entity");
                self.repo
                    .save(ctx, &entity)
                    .await
                    .map_err(|e| self.fail(ctx, "save", raw, IngestError::Repository(e)))?;
                self.run_hook(ctx, raw, &entity).await?;
                Applied::Saved
            }
            Some(WriteOp::Update) => {
                let entity = E::restructure(record);
                debug!(kind = E::KIND, key = %entity.key(), event_type = %envelope.event_type, "Updating entity");
                self.repo
                    .update(ctx, &entity)
                    .await
                    .map_err(|e| self.fail(ctx, "update", raw, IngestError::Repository(e)))?;
                self.run_hook(ctx, raw, &entity).await?;
                Applied::Updated
            }
            Some(WriteOp::Delete) => {
                let entity = E::key_only(&record);
                debug!(kind = E::KIND, key = %entity.key(), event_type = %envelope.event_type, "Deleting entity");
                self.repo
                    .delete(ctx, &entity)
                    .await
                    .map_err(|e| self.fail(ctx, "delete", raw, IngestError::Repository(e)))?;
                Applied::Deleted
            }
            None => {
                warn!(
                    kind = E::KIND,
                    event_type = %envelope.event_type,
                    message_id = %ctx.message_id(),
                    "Ignoring event with unknown type"
                );
                Applied::Ignored
            }
        };

        Ok(applied)
    }

    /// The primary write has already landed; a hook failure leaves it in
    /// place and relies on redelivery to converge.
    async fn run_hook(&self, ctx: &MessageContext, raw: &[u8], entity: &E) -> Result<()> {
        let Some(hook) = &self.hook else {
            return Ok(());
        };
        hook.after_write(ctx, entity)
            .await
            .map_err(|e| self.fail(ctx, hook.name(), raw, IngestError::Repository(e)))
    }

    fn fail(&self, ctx: &MessageContext, action: &str, raw: &[u8], err: IngestError) -> IngestError {
        let scope = format!("{}.{}", E::KIND, action);
        self.reporter.send_error_log(ctx, COMPONENT, &scope, &err, raw);
        err
    }
}

#[async_trait]
impl<E: Entity> MessageHandler for EventHandler<E> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, ctx: &MessageContext, raw: &[u8]) -> Result<()> {
        let result = self.apply(ctx, raw).await;
        record_outcome(&self.name, &result);
        result.map(|_| ())
    }
}

// ============================================================================
// Contact -> member password sync
// ============================================================================

/// Pushes `{email, password, salt, last_password_modified}` of a synced
/// contact into the member store.
pub struct MemberPasswordSync {
    members: Arc<dyn MemberRepository>,
}

impl MemberPasswordSync {
    pub fn new(members: Arc<dyn MemberRepository>) -> Self {
        Self { members }
    }
}

#[async_trait]
impl WriteHook<Contact> for MemberPasswordSync {
    fn name(&self) -> &str {
        "member_password_sync"
    }

    async fn after_write(&self, ctx: &MessageContext, contact: &Contact) -> anyhow::Result<()> {
        if !contact.is_sync {
            return Ok(());
        }
        debug!(contact_id = contact.id, "Syncing member password");
        self.members
            .update_password_member_by_email(ctx, contact.member_password())
            .await
    }
}
