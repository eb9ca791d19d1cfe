//! Agent reply composition.
//!
//! Builds the instruction + context pair fed to the text-generation
//! collaborator and returns its phrasing verbatim (trimmed). Generation
//! failure never aborts a conversation turn: the composer degrades to a
//! deterministic offline placeholder so the tenant still gets a reply.
//! Posting the composed text is the dispatcher's job.

use std::sync::Arc;

use tracing::warn;

use crate::collaborators::{ChatMessage, TextGenerator};

pub struct ReplyComposer {
    generator: Option<Arc<dyn TextGenerator>>,
    system_prompt: String,
    default_persona: String,
}

impl ReplyComposer {
    pub fn new(
        generator: Option<Arc<dyn TextGenerator>>,
        system_prompt: impl Into<String>,
        default_persona: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            system_prompt: system_prompt.into(),
            default_persona: default_persona.into(),
        }
    }

    /// Join the most recent `limit` messages, oldest-first, as
    /// `speaker: text` lines. Empty texts are skipped.
    pub fn build_context(messages: &[ChatMessage], limit: usize) -> String {
        let start = messages.len().saturating_sub(limit);
        messages[start..]
            .iter()
            .filter(|m| !m.text.is_empty())
            .map(|m| format!("{}: {}", m.speaker, m.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Phrase a reply for `instruction`, optionally grounded in `context`
    /// and steered by `persona` (falls back to the configured default).
    pub async fn compose(
        &self,
        instruction: &str,
        context: Option<&str>,
        persona: Option<&str>,
    ) -> String {
        let mut system = self.system_prompt.clone();
        let persona = persona.unwrap_or(&self.default_persona);
        if !persona.is_empty() {
            system.push_str(&format!(
                " You are currently supporting the {persona} persona."
            ));
        }

        let combined = match context.filter(|c| !c.is_empty()) {
            Some(ctx) => {
                system.push_str(&format!(" Context: {ctx}."));
                format!("Context:\n{ctx}\n\nUser:\n{instruction}")
            }
            None => instruction.to_string(),
        };

        if let Some(generator) = &self.generator {
            match generator.generate(&system, &combined).await {
                Ok(text) if !text.trim().is_empty() => return text.trim().to_string(),
                Ok(_) => warn!("text generator returned an empty reply"),
                Err(error) => warn!(%error, "text generation failed; using offline reply"),
            }
        }
        offline_reply(instruction)
    }
}

/// Deterministic degraded reply used when no generator is reachable.
fn offline_reply(instruction: &str) -> String {
    let reversed: String = instruction.chars().rev().collect();
    format!("(Agent offline) {reversed}")
}
