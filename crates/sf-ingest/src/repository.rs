//! Repository collaborators
//!
//! Persistence is owned by the surrounding application. The routers only see
//! these traits and pass canonical entities through them.

use async_trait::async_trait;
use sf_common::{MemberPassword, MessageContext};

/// Write capability for one entity kind.
///
/// `save` must upsert by primary key and `delete` must succeed when the key
/// is absent; redelivered messages rely on both.
#[async_trait]
pub trait Repository<E: Sync>: Send + Sync {
    async fn save(&self, ctx: &MessageContext, entity: &E) -> anyhow::Result<()>;
    async fn update(&self, ctx: &MessageContext, entity: &E) -> anyhow::Result<()>;
    async fn delete(&self, ctx: &MessageContext, entity: &E) -> anyhow::Result<()>;
}

/// Member store, written to when a synced contact changes.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn update_password_member_by_email(
        &self,
        ctx: &MessageContext,
        password: MemberPassword,
    ) -> anyhow::Result<()>;
}

/// Second write performed after a successful create/update of `E`.
#[async_trait]
pub trait WriteHook<E: Sync>: Send + Sync {
    fn name(&self) -> &str;
    async fn after_write(&self, ctx: &MessageContext, entity: &E) -> anyhow::Result<()>;
}
