//! Storefront Ingest shared types
//!
//! Everything that crosses the boundary between the broker harness, the
//! ingestion routers and the repository/use-case collaborators:
//! - MessageContext: per-message context (message id, injected auth token)
//! - Envelopes: CDC `{before, after, op}`, flat `{eventType, payload}` and generic job shapes
//! - Entities: canonical repository-ready entities and their nullable change-capture records
//! - BirthDate: tagged variant for the multi-encoding birth date column
//! - Job payloads: typed email and audit-log payloads for the job dispatcher

pub mod birth_date;
pub mod contact;
pub mod context;
pub mod entities;
pub mod entity;
pub mod envelope;
pub mod jobs;

pub use birth_date::BirthDate;
pub use contact::{Contact, ContactRecord, ContactTemp, ContactTempRecord, MemberPassword};
pub use context::MessageContext;
pub use entities::*;
pub use entity::Entity;
pub use envelope::{CdcEnvelope, CdcPayload, EventEnvelope, JobEnvelope, WriteOp};
pub use jobs::{LogAction, LogPayload, MemberEmail, MerchantEmail, MerchantEmployeeEmail};
