//! Topic -> handler registry
//!
//! Built once at startup from the routing config. Each of the twelve
//! replicated entities gets a CDC topic, eight of them also get a non-CDC
//! event topic, and a single topic carries generic jobs.

use std::collections::HashMap;
use std::sync::Arc;

use sf_common::{
    Account, AccountContact, AccountTemporary, Address, Contact, ContactAddress, ContactDocument, ContactNpwp,
    ContactTemp, Document, Entity, Leads, MessageContext, Phone,
};
use sf_config::RoutingConfig;
use tracing::{debug, info};

use crate::cdc::CdcHandler;
use crate::error::IngestError;
use crate::event::{self, EventHandler, EventTypes, MemberPasswordSync};
use crate::handler::MessageHandler;
use crate::job::JobDispatcher;
use crate::reporter::FailureReporter;
use crate::repository::{MemberRepository, Repository};
use crate::usecase::{MemberUseCase, MerchantUseCase, ShippingUseCase};
use crate::Result;

/// Everything the routers write to or call into.
#[derive(Clone)]
pub struct Collaborators {
    pub accounts: Arc<dyn Repository<Account>>,
    pub account_contacts: Arc<dyn Repository<AccountContact>>,
    pub addresses: Arc<dyn Repository<Address>>,
    pub phones: Arc<dyn Repository<Phone>>,
    pub documents: Arc<dyn Repository<Document>>,
    pub contact_npwps: Arc<dyn Repository<ContactNpwp>>,
    pub contact_addresses: Arc<dyn Repository<ContactAddress>>,
    pub leads: Arc<dyn Repository<Leads>>,
    pub contact_documents: Arc<dyn Repository<ContactDocument>>,
    pub account_temporaries: Arc<dyn Repository<AccountTemporary>>,
    pub contacts: Arc<dyn Repository<Contact>>,
    pub contact_temps: Arc<dyn Repository<ContactTemp>>,
    pub members: Arc<dyn MemberRepository>,
    pub merchant: Arc<dyn MerchantUseCase>,
    pub member: Arc<dyn MemberUseCase>,
    pub shipping: Arc<dyn ShippingUseCase>,
}

pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn MessageHandler>>,
}

impl HandlerRegistry {
    pub fn build(routing: &RoutingConfig, deps: &Collaborators, reporter: Arc<FailureReporter>) -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
        };

        registry.cdc(routing, &deps.accounts, &reporter);
        registry.cdc(routing, &deps.account_contacts, &reporter);
        registry.cdc(routing, &deps.addresses, &reporter);
        registry.cdc(routing, &deps.phones, &reporter);
        registry.cdc(routing, &deps.documents, &reporter);
        registry.cdc(routing, &deps.contact_npwps, &reporter);
        registry.cdc(routing, &deps.contact_addresses, &reporter);
        registry.cdc(routing, &deps.leads, &reporter);
        registry.cdc(routing, &deps.contact_documents, &reporter);
        registry.cdc(routing, &deps.account_temporaries, &reporter);
        registry.cdc(routing, &deps.contacts, &reporter);
        registry.cdc(routing, &deps.contact_temps, &reporter);

        registry.event(routing, event::ACCOUNT_EVENTS, &deps.accounts, &reporter);
        registry.event(routing, event::ADDRESS_EVENTS, &deps.addresses, &reporter);
        registry.event(routing, event::PHONE_EVENTS, &deps.phones, &reporter);
        registry.event(routing, event::DOCUMENT_EVENTS, &deps.documents, &reporter);
        registry.event(routing, event::CONTACT_NPWP_EVENTS, &deps.contact_npwps, &reporter);
        registry.event(routing, event::CONTACT_ADDRESS_EVENTS, &deps.contact_addresses, &reporter);
        registry.event(routing, event::CONTACT_DOCUMENT_EVENTS, &deps.contact_documents, &reporter);

        let contacts = EventHandler::new(event::CONTACT_EVENTS, Arc::clone(&deps.contacts), Arc::clone(&reporter))
            .with_hook(Arc::new(MemberPasswordSync::new(Arc::clone(&deps.members))));
        registry.insert(routing.event_topic(Contact::KIND), Arc::new(contacts));

        let jobs = JobDispatcher::new(
            Arc::clone(&deps.merchant),
            Arc::clone(&deps.member),
            Arc::clone(&deps.shipping),
            reporter,
        );
        registry.insert(routing.job_topic.clone(), Arc::new(jobs));

        info!(topics = registry.len(), "Handler registry built");
        registry
    }

    fn cdc<E: Entity>(&mut self, routing: &RoutingConfig, repo: &Arc<dyn Repository<E>>, reporter: &Arc<FailureReporter>) {
        let handler = CdcHandler::new(Arc::clone(repo), Arc::clone(reporter));
        self.insert(routing.cdc_topic(E::KIND), Arc::new(handler));
    }

    fn event<E: Entity>(
        &mut self,
        routing: &RoutingConfig,
        events: EventTypes,
        repo: &Arc<dyn Repository<E>>,
        reporter: &Arc<FailureReporter>,
    ) {
        let handler = EventHandler::new(events, Arc::clone(repo), Arc::clone(reporter));
        self.insert(routing.event_topic(E::KIND), Arc::new(handler));
    }

    fn insert(&mut self, topic: String, handler: Arc<dyn MessageHandler>) {
        debug!(topic = %topic, handler = handler.name(), "Registering handler");
        self.handlers.insert(topic, handler);
    }

    pub fn get(&self, topic: &str) -> Option<&Arc<dyn MessageHandler>> {
        self.handlers.get(topic)
    }

    /// Hand one message to the handler registered for `topic`.
    pub async fn route(&self, topic: &str, ctx: &MessageContext, raw: &[u8]) -> Result<()> {
        let handler = self
            .get(topic)
            .ok_or_else(|| IngestError::UnknownTopic(topic.to_string()))?;
        handler.handle(ctx, raw).await
    }

    /// Registered topics, sorted.
    pub fn topics(&self) -> Vec<&str> {
        let mut topics: Vec<_> = self.handlers.keys().map(String::as_str).collect();
        topics.sort_unstable();
        topics
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
