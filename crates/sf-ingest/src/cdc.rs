//! CDC Operation Router
//!
//! One generic routine serves every replicated entity: decode the
//! `{before, after, op}` envelope, restructure into the canonical shape and
//! apply it through the entity's repository. Creates and updates both upsert
//! the full `after` image; deletes carry only the key from `before`. Row
//! images stay untyped until the op is known, so an unknown op is ignored
//! whatever its rows look like.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use sf_common::{CdcEnvelope, Entity, MessageContext, WriteOp};
use tracing::{debug, warn};

use crate::decoder::{decode, decode_record};
use crate::error::IngestError;
use crate::handler::{record_outcome, Applied, MessageHandler};
use crate::reporter::FailureReporter;
use crate::repository::Repository;
use crate::Result;

const COMPONENT: &str = "cdc_router";

pub struct CdcHandler<E: Entity> {
    name: String,
    repo: Arc<dyn Repository<E>>,
    reporter: Arc<FailureReporter>,
}

impl<E: Entity> CdcHandler<E> {
    pub fn new(repo: Arc<dyn Repository<E>>, reporter: Arc<FailureReporter>) -> Self {
        Self {
            name: format!("cdc.{}", E::KIND),
            repo,
            reporter,
        }
    }

    /// Decode and apply one change message.
    pub async fn apply(&self, ctx: &MessageContext, raw: &[u8]) -> Result<Applied> {
        let envelope: CdcEnvelope<Value> = decode(raw, COMPONENT, E::KIND)?;
        let payload = envelope.payload;

        match WriteOp::from_cdc_code(&payload.op) {
            Some(op @ (WriteOp::Create | WriteOp::Update)) => {
                let record = decode_record::<E::Record>(payload.after, COMPONENT, E::KIND)?;
                let entity = E::restructure(record);
                debug!(kind = E::KIND, key = %entity.key(), op = op.as_str(), "Upserting entity");

                self.repo
                    .save(ctx, &entity)
                    .await
                    .map_err(|e| self.fail(ctx, "save", raw, IngestError::Repository(e)))?;
                Ok(Applied::Saved)
            }
            Some(WriteOp::Delete) => {
                let record = decode_record::<E::Record>(payload.before, COMPONENT, E::KIND)?;
                let entity = E::key_only(&record);
                debug!(kind = E::KIND, key = %entity.key(), "Deleting entity");

                self.repo
                    .delete(ctx, &entity)
                    .await
                    .map_err(|e| self.fail(ctx, "delete", raw, IngestError::Repository(e)))?;
                Ok(Applied::Deleted)
            }
            None => {
                warn!(
                    kind = E::KIND,
                    op = %payload.op,
                    message_id = %ctx.message_id(),
                    "Ignoring change with unknown op"
                );
                Ok(Applied::Ignored)
            }
        }
    }

    fn fail(&self, ctx: &MessageContext, action: &str, raw: &[u8], err: IngestError) -> IngestError {
        let scope = format!("{}.{}", E::KIND, action);
        self.reporter.send_error_log(ctx, COMPONENT, &scope, &err, raw);
        err
    }
}

#[async_trait]
impl<E: Entity> MessageHandler for CdcHandler<E> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, ctx: &MessageContext, raw: &[u8]) -> Result<()> {
        let result = self.apply(ctx, raw).await;
        record_outcome(&self.name, &result);
        result.map(|_| ())
    }
}
