//! Canonical Entities
//!
//! Repository-ready shapes of the replicated business objects, each paired
//! with the nullable record it is restructured from. Contact and ContactTemp
//! carry a multi-encoding birth date and live in [`crate::contact`].

use crate::entity::canonical_entity;

canonical_entity! {
    /// Merchant or customer account.
    Account, AccountRecord, "account",
    key: id: String,
    {
        name: String,
        account_type: String,
        email: String,
        phone: String,
        status: String,
        created_at: String,
        updated_at: String,
    }
}

canonical_entity! {
    /// Link between an account and one of its contacts.
    AccountContact, AccountContactRecord, "account_contact",
    key: id: i64,
    {
        account_id: String,
        contact_id: i64,
        is_primary: bool,
        created_at: String,
        updated_at: String,
    }
}

canonical_entity! {
    Address, AddressRecord, "address",
    key: id: i64,
    {
        contact_id: i64,
        label: String,
        street: String,
        city: String,
        province: String,
        postal_code: String,
        country: String,
        is_primary: bool,
        created_at: String,
        updated_at: String,
    }
}

canonical_entity! {
    Phone, PhoneRecord, "phone",
    key: id: i64,
    {
        contact_id: i64,
        number: String,
        phone_type: String,
        is_primary: bool,
        created_at: String,
        updated_at: String,
    }
}

canonical_entity! {
    /// Uploaded document metadata; the file itself lives in object storage.
    Document, DocumentRecord, "document",
    key: id: i64,
    {
        name: String,
        document_type: String,
        url: String,
        created_at: String,
        updated_at: String,
    }
}

canonical_entity! {
    /// Tax registration (NPWP) of a contact.
    ContactNpwp, ContactNpwpRecord, "contact_npwp",
    key: id: i64,
    {
        contact_id: i64,
        npwp_number: String,
        name: String,
        address: String,
        created_at: String,
        updated_at: String,
    }
}

canonical_entity! {
    ContactAddress, ContactAddressRecord, "contact_address",
    key: id: i64,
    {
        contact_id: i64,
        address_id: i64,
        created_at: String,
        updated_at: String,
    }
}

canonical_entity! {
    /// Sales lead, optionally attached to an account once converted.
    Leads, LeadsRecord, "leads",
    key: id: i64,
    {
        name: String,
        email: String,
        phone: String,
        source: String,
        status: String,
        account_id: String,
        created_at: String,
        updated_at: String,
    }
}

canonical_entity! {
    ContactDocument, ContactDocumentRecord, "contact_document",
    key: id: i64,
    {
        contact_id: i64,
        document_id: i64,
        created_at: String,
        updated_at: String,
    }
}

canonical_entity! {
    /// Account awaiting verification before promotion to [`Account`].
    AccountTemporary, AccountTemporaryRecord, "account_temporary",
    key: id: String,
    {
        name: String,
        email: String,
        phone: String,
        account_type: String,
        created_at: String,
        updated_at: String,
    }
}
