//! Job Payloads
//!
//! Typed payloads the job dispatcher decodes the opaque `payload` of a
//! generic job envelope into, one per job family.

use serde::{Deserialize, Serialize};

/// Transactional email addressed to a merchant owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MerchantEmail {
    pub merchant_id: String,
    pub merchant_name: String,
    pub email: String,
    pub recipient_name: String,
    pub token: String,
    pub url: String,
    /// Only set on rejection emails.
    pub reason: String,
}

/// Transactional email addressed to a merchant employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MerchantEmployeeEmail {
    pub merchant_id: String,
    pub merchant_name: String,
    pub employee_id: String,
    pub email: String,
    pub name: String,
    pub token: String,
    pub url: String,
}

/// Transactional email addressed to a member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberEmail {
    pub member_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub token: String,
    pub url: String,
}

/// Before/after snapshots of an audited entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogPayload {
    pub before: serde_json::Value,
    pub after: serde_json::Value,
}

/// Audit log action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogAction {
    Create,
    Update,
    Delete,
}

impl LogAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for LogAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
