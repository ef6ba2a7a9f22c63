//! In-memory repositories
//!
//! DashMap-backed stores with the same upsert/delete-if-present semantics a
//! real repository must have. Used by the dev harness and tests.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use sf_common::{
    Account, AccountContact, AccountTemporary, Address, Contact, ContactAddress, ContactDocument, ContactNpwp,
    ContactTemp, Document, Entity, Leads, MemberPassword, MessageContext, Phone,
};

use crate::registry::Collaborators;
use crate::repository::{MemberRepository, Repository};
use crate::usecase::{MemberUseCase, MerchantUseCase, ShippingUseCase};

/// Rows of one entity kind keyed by [`Entity::key`].
pub struct InMemoryRepository<E: Entity> {
    rows: DashMap<String, E>,
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self { rows: DashMap::new() }
    }

    pub fn get(&self, key: &str) -> Option<E> {
        self.rows.get(key).map(|row| row.value().clone())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn save(&self, _ctx: &MessageContext, entity: &E) -> anyhow::Result<()> {
        self.rows.insert(entity.key(), entity.clone());
        Ok(())
    }

    async fn update(&self, _ctx: &MessageContext, entity: &E) -> anyhow::Result<()> {
        self.rows.insert(entity.key(), entity.clone());
        Ok(())
    }

    async fn delete(&self, _ctx: &MessageContext, entity: &E) -> anyhow::Result<()> {
        self.rows.remove(&entity.key());
        Ok(())
    }
}

/// Member credentials keyed by email.
#[derive(Default)]
pub struct InMemoryMemberRepository {
    passwords: DashMap<String, MemberPassword>,
}

impl InMemoryMemberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, email: &str) -> Option<MemberPassword> {
        self.passwords.get(email).map(|row| row.value().clone())
    }

    pub fn len(&self) -> usize {
        self.passwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passwords.is_empty()
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn update_password_member_by_email(
        &self,
        _ctx: &MessageContext,
        password: MemberPassword,
    ) -> anyhow::Result<()> {
        self.passwords.insert(password.email.clone(), password);
        Ok(())
    }
}

/// One in-memory repository per entity kind plus the member store.
#[derive(Default)]
pub struct InMemoryStores {
    pub accounts: Arc<InMemoryRepository<Account>>,
    pub account_contacts: Arc<InMemoryRepository<AccountContact>>,
    pub addresses: Arc<InMemoryRepository<Address>>,
    pub phones: Arc<InMemoryRepository<Phone>>,
    pub documents: Arc<InMemoryRepository<Document>>,
    pub contact_npwps: Arc<InMemoryRepository<ContactNpwp>>,
    pub contact_addresses: Arc<InMemoryRepository<ContactAddress>>,
    pub leads: Arc<InMemoryRepository<Leads>>,
    pub contact_documents: Arc<InMemoryRepository<ContactDocument>>,
    pub account_temporaries: Arc<InMemoryRepository<AccountTemporary>>,
    pub contacts: Arc<InMemoryRepository<Contact>>,
    pub contact_temps: Arc<InMemoryRepository<ContactTemp>>,
    pub members: Arc<InMemoryMemberRepository>,
}

impl InMemoryStores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire these stores and the given use cases into router collaborators.
    pub fn collaborators(
        &self,
        merchant: Arc<dyn MerchantUseCase>,
        member: Arc<dyn MemberUseCase>,
        shipping: Arc<dyn ShippingUseCase>,
    ) -> Collaborators {
        Collaborators {
            accounts: self.accounts.clone(),
            account_contacts: self.account_contacts.clone(),
            addresses: self.addresses.clone(),
            phones: self.phones.clone(),
            documents: self.documents.clone(),
            contact_npwps: self.contact_npwps.clone(),
            contact_addresses: self.contact_addresses.clone(),
            leads: self.leads.clone(),
            contact_documents: self.contact_documents.clone(),
            account_temporaries: self.account_temporaries.clone(),
            contacts: self.contacts.clone(),
            contact_temps: self.contact_temps.clone(),
            members: self.members.clone(),
            merchant,
            member,
            shipping,
        }
    }
}
