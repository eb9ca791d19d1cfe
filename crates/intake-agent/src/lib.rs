//! Chat-driven maintenance intake agent.
//!
//! Receives chat-platform webhook deliveries, drives the deterministic
//! discovery interview from the `triage` crate, phrases agent replies
//! through a pluggable text-generation collaborator, and escalates failed
//! DIY attempts into incident records.
//!
//! Everything external (conversation state storage, message transport,
//! text generation, incident persistence) is reached through the
//! capability traits in [`collaborators`], constructed by the caller and
//! handed to [`dispatcher::WebhookDispatcher`]. The HTTP layer that feeds
//! raw webhook bodies into the dispatcher lives outside this crate.

pub mod collaborators;
pub mod composer;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod llm_bridge;
pub mod memory;
pub mod recorder;
pub mod signature;

pub use collaborators::{
    ChatMessage, ContextReader, ConversationStore, IncidentStore, MessagingTransport,
    TextGenerator,
};
pub use composer::ReplyComposer;
pub use config::{IntakeConfig, LlmEndpoint};
pub use dispatcher::{DispatchStatus, WebhookDispatcher, WebhookEvent};
pub use error::IntakeError;
pub use llm_bridge::CompletionClient;
pub use recorder::IncidentRecorder;
