//! Error taxonomy for webhook dispatch.
//!
//! Every failure the dispatcher can surface is represented here so callers
//! can map variants to transport responses without string matching. The
//! first three variants reject a delivery before any state is read or
//! written; the rest wrap collaborator failures and are never masked as
//! success.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntakeError {
    /// A required secret or credential is missing; the webhook path never
    /// degrades to unsigned processing.
    #[error("not configured: {0}")]
    NotConfigured(&'static str),

    /// Signature header missing, malformed, or not matching the body.
    #[error("webhook signature rejected")]
    Unauthorized,

    /// Request body was not a parseable event.
    #[error("malformed webhook event: {0}")]
    MalformedEvent(#[from] serde_json::Error),

    /// Conversation state could not be read or written.
    #[error("conversation store failure: {0}")]
    Store(#[source] anyhow::Error),

    /// Message posting or context reading failed.
    #[error("messaging transport failure: {0}")]
    Messaging(#[source] anyhow::Error),

    /// The incident record could not be persisted.
    #[error("incident persistence failure: {0}")]
    Persistence(#[source] anyhow::Error),
}

impl IntakeError {
    /// Rejections that happen before any side effect; the caller should
    /// answer these with a client-error response rather than retry.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotConfigured(_) | Self::Unauthorized | Self::MalformedEvent(_)
        )
    }
}
