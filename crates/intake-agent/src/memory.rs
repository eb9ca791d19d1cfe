//! In-memory collaborators.
//!
//! Back the test suite and the binary's `--simulate` mode. These are
//! process-local doubles, not a persistence fallback: production deployments
//! implement the traits against their real chat platform and store. The
//! single Mutex per structure also means the per-conversation update
//! serialization the `ConversationStore` contract asks for only holds
//! within one process.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::Result;
use async_trait::async_trait;
use triage::{DiscoveryState, Incident};

use crate::collaborators::{
    ChatMessage, ContextReader, ConversationStore, IncidentStore, MessagingTransport,
};

/// Conversation state + transcript held in process memory.
pub struct MemoryConversation {
    agent_name: String,
    states: Mutex<HashMap<String, DiscoveryState>>,
    transcripts: Mutex<HashMap<String, Vec<ChatMessage>>>,
}

impl MemoryConversation {
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            states: Mutex::new(HashMap::new()),
            transcripts: Mutex::new(HashMap::new()),
        }
    }

    /// Append a non-agent message to the transcript (the simulated tenant).
    pub fn say(&self, conversation_id: &str, speaker: &str, text: &str) {
        lock(&self.transcripts)
            .entry(conversation_id.to_string())
            .or_default()
            .push(ChatMessage {
                speaker: speaker.to_string(),
                text: text.to_string(),
            });
    }

    /// Full transcript for assertions and the simulator's printout.
    pub fn messages(&self, conversation_id: &str) -> Vec<ChatMessage> {
        lock(&self.transcripts)
            .get(conversation_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Stored state snapshot, if any.
    pub fn state_of(&self, conversation_id: &str) -> Option<DiscoveryState> {
        lock(&self.states).get(conversation_id).cloned()
    }
}

/// Recover from lock poisoning; these doubles are append-only, so the
/// data stays coherent even if a holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl ConversationStore for MemoryConversation {
    async fn get_state(&self, conversation_id: &str) -> Result<Option<DiscoveryState>> {
        Ok(self.state_of(conversation_id))
    }

    async fn set_state(&self, conversation_id: &str, state: &DiscoveryState) -> Result<()> {
        lock(&self.states).insert(conversation_id.to_string(), state.clone());
        Ok(())
    }
}

#[async_trait]
impl ContextReader for MemoryConversation {
    async fn recent_messages(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>> {
        let all = self.messages(conversation_id);
        let start = all.len().saturating_sub(limit);
        Ok(all[start..].to_vec())
    }
}

#[async_trait]
impl MessagingTransport for MemoryConversation {
    async fn post_message(&self, conversation_id: &str, text: &str) -> Result<()> {
        self.say(conversation_id, &self.agent_name, text);
        Ok(())
    }
}

/// Incident sink that keeps everything it is handed.
#[derive(Default)]
pub struct MemoryIncidentLog {
    incidents: Mutex<Vec<Incident>>,
}

impl MemoryIncidentLog {
    pub fn incidents(&self) -> Vec<Incident> {
        lock(&self.incidents).clone()
    }
}

#[async_trait]
impl IncidentStore for MemoryIncidentLog {
    async fn put_incident(&self, incident: &Incident) -> Result<()> {
        lock(&self.incidents).push(incident.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage::DiscoveryStage;

    #[tokio::test]
    async fn state_roundtrips_per_conversation() {
        let store = MemoryConversation::new("Agent");
        assert!(store.get_state("a").await.unwrap().is_none());

        let state = DiscoveryState {
            stage: DiscoveryStage::Questions,
            question_index: 2,
            ..Default::default()
        };
        store.set_state("a", &state).await.unwrap();
        assert_eq!(store.get_state("a").await.unwrap(), Some(state));
        assert!(store.get_state("b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn recent_messages_windows_from_the_tail() {
        let store = MemoryConversation::new("Agent");
        for i in 0..5 {
            store.say("a", "tenant", &format!("m{i}"));
        }
        let window = store.recent_messages("a", 2).await.unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].text, "m3");
        assert_eq!(window[1].text, "m4");
    }

    #[tokio::test]
    async fn agent_posts_land_in_the_transcript_under_the_agent_name() {
        let store = MemoryConversation::new("Agent");
        store.post_message("a", "hello").await.unwrap();
        let messages = store.messages("a");
        assert_eq!(messages[0].speaker, "Agent");
        assert_eq!(messages[0].text, "hello");
    }
}
