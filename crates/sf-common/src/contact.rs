//! Contact entities
//!
//! Contacts carry the member credentials that are mirrored into the member
//! store when `is_sync` is set, and a birth date that arrives in several
//! encodings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::birth_date::BirthDate;
use crate::entity::Entity;

// ============================================================================
// Contact
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub salt: String,
    pub last_password_modified: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: String,
    /// Mirror credentials into the member store after every write.
    pub is_sync: bool,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub salt: Option<String>,
    pub last_password_modified: Option<String>,
    pub birth_date: Option<BirthDate>,
    pub gender: Option<String>,
    pub is_sync: Option<bool>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Contact {
    /// Credentials to push into the member store.
    pub fn member_password(&self) -> MemberPassword {
        MemberPassword {
            email: self.email.clone(),
            password: self.password.clone(),
            salt: self.salt.clone(),
            last_password_modified: self.last_password_modified.clone(),
        }
    }
}

impl Entity for Contact {
    type Record = ContactRecord;

    const KIND: &'static str = "contact";

    fn restructure(record: ContactRecord) -> Self {
        Self {
            id: record.id.unwrap_or_default(),
            first_name: record.first_name.unwrap_or_default(),
            last_name: record.last_name.unwrap_or_default(),
            email: record.email.unwrap_or_default(),
            password: record.password.unwrap_or_default(),
            salt: record.salt.unwrap_or_default(),
            last_password_modified: record.last_password_modified.unwrap_or_default(),
            birth_date: record.birth_date.as_ref().and_then(BirthDate::to_date),
            gender: record.gender.unwrap_or_default(),
            is_sync: record.is_sync.unwrap_or_default(),
            status: record.status.unwrap_or_default(),
            created_at: record.created_at.unwrap_or_default(),
            updated_at: record.updated_at.unwrap_or_default(),
        }
    }

    fn key_only(record: &ContactRecord) -> Self {
        Self {
            id: record.id.unwrap_or_default(),
            ..Self::default()
        }
    }

    fn key(&self) -> String {
        self.id.to_string()
    }
}

/// Member credential update derived from a synced contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberPassword {
    pub email: String,
    pub password: String,
    pub salt: String,
    pub last_password_modified: String,
}

// ============================================================================
// ContactTemp
// ============================================================================

/// Contact captured during registration, before verification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactTemp {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactTempRecord {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<BirthDate>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Entity for ContactTemp {
    type Record = ContactTempRecord;

    const KIND: &'static str = "contact_temp";

    fn restructure(record: ContactTempRecord) -> Self {
        Self {
            id: record.id.unwrap_or_default(),
            first_name: record.first_name.unwrap_or_default(),
            last_name: record.last_name.unwrap_or_default(),
            email: record.email.unwrap_or_default(),
            phone: record.phone.unwrap_or_default(),
            birth_date: record.birth_date.as_ref().and_then(BirthDate::to_date),
            created_at: record.created_at.unwrap_or_default(),
            updated_at: record.updated_at.unwrap_or_default(),
        }
    }

    fn key_only(record: &ContactTempRecord) -> Self {
        Self {
            id: record.id.unwrap_or_default(),
            ..Self::default()
        }
    }

    fn key(&self) -> String {
        self.id.to_string()
    }
}
