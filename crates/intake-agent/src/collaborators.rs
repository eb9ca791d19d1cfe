//! Capability traits for everything the intake agent reaches outside itself.
//!
//! Implementations are constructed by the caller and passed in explicitly,
//! never held as module-level singletons, so tests substitute doubles and
//! production wires whatever chat platform, model vendor, and store it runs
//! against. All methods may block on network I/O; none retry internally
//! (retries belong to the implementor's client).

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use triage::{DiscoveryState, Incident};

/// One line of conversation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub speaker: String,
    pub text: String,
}

/// Per-conversation discovery state, keyed by conversation id.
///
/// Implementors must serialize updates per conversation (compare-and-set
/// or a per-key lock): the dispatcher itself is lock-free, and two
/// concurrent deliveries for one conversation would otherwise lose updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn get_state(&self, conversation_id: &str) -> Result<Option<DiscoveryState>>;
    async fn set_state(&self, conversation_id: &str, state: &DiscoveryState) -> Result<()>;
}

/// Read-side of the chat platform: the recent message window used to give
/// the reply composer conversational context.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContextReader: Send + Sync {
    /// The most recent `limit` messages, oldest-first within that window.
    async fn recent_messages(&self, conversation_id: &str, limit: usize)
        -> Result<Vec<ChatMessage>>;
}

/// Write-side of the chat platform. Implementations attribute every post
/// to the fixed agent identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingTransport: Send + Sync {
    async fn post_message(&self, conversation_id: &str, text: &str) -> Result<()>;
}

/// The model call that phrases agent replies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system_instructions: &str, user_text: &str) -> Result<String>;
}

/// Durable storage for escalated incidents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IncidentStore: Send + Sync {
    async fn put_incident(&self, incident: &Incident) -> Result<()>;
}
