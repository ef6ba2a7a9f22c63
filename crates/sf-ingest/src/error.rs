//! Ingest Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    /// Malformed envelope JSON or a payload that does not fit the target shape.
    #[error("Decode error in {component} ({scope}): {source}")]
    Decode {
        component: &'static str,
        scope: String,
        #[source]
        source: serde_json::Error,
    },

    /// Passed through from a repository collaborator.
    #[error(transparent)]
    Repository(anyhow::Error),

    /// Passed through from a use-case collaborator.
    #[error(transparent)]
    UseCase(anyhow::Error),

    #[error("No handler registered for topic {0}")]
    UnknownTopic(String),
}

impl IngestError {
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
