//! Per-message context handed to every router, repository and use case.

/// Context for one inbound message.
///
/// Carries the identifiers used for log correlation and the auth token the
/// job dispatcher injects before calling a use case. Cheap to clone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageContext {
    message_id: String,
    auth: Option<String>,
}

impl MessageContext {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            auth: None,
        }
    }

    /// Context with a generated message id, for messages the broker did not label.
    pub fn generated() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }

    /// Attach an auth token. An empty token clears any existing one.
    pub fn with_auth(mut self, auth: impl Into<String>) -> Self {
        let auth = auth.into();
        self.auth = if auth.is_empty() { None } else { Some(auth) };
        self
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn auth(&self) -> Option<&str> {
        self.auth.as_deref()
    }
}
