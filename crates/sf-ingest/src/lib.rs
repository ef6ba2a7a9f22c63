//! Storefront Ingest
//!
//! Routers that turn broker messages into repository writes and use-case
//! calls:
//! - CdcHandler: change-capture `{before, after, op}` for twelve entities
//! - EventHandler: application `{eventType, payload}` events for eight entities,
//!   with the contact -> member password sync as a post-write hook
//! - JobDispatcher: generic `{eventType, payload, auth}` jobs for emails and audit logs
//! - FailureReporter: structured error logs and operator alerts
//! - HandlerRegistry: topic -> handler table the harness routes through
//!
//! Handlers return `Ok` to ack. Errors are logged where they happen and
//! returned verbatim; there is no local retry.

pub mod cdc;
pub mod decoder;
pub mod error;
pub mod event;
pub mod handler;
pub mod job;
pub mod memory;
pub mod notifier;
pub mod registry;
pub mod reporter;
pub mod repository;
pub mod usecase;

pub use cdc::CdcHandler;
pub use error::IngestError;
pub use event::{EventHandler, EventTypes, MemberPasswordSync};
pub use handler::{Applied, MessageHandler};
pub use job::JobDispatcher;
pub use memory::{InMemoryMemberRepository, InMemoryRepository, InMemoryStores};
pub use notifier::{Alert, LogNotifier, Notifier, WebhookNotifier, WebhookNotifierConfig};
pub use registry::{Collaborators, HandlerRegistry};
pub use reporter::FailureReporter;
pub use repository::{MemberRepository, Repository, WriteHook};
pub use usecase::{MemberUseCase, MerchantUseCase, ShippingUseCase};

pub type Result<T> = std::result::Result<T, IngestError>;
