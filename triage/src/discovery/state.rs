//! Persisted per-conversation interview state.
//!
//! Stored as opaque structured data attached to the conversation by the
//! surrounding system; every field tolerates being absent so partially
//! written or older state still loads.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classify::Classification;

/// Where a conversation currently sits in the intake flow.
///
/// Unknown tags deserialize to `None`: corrupt state restarts the
/// interview instead of wedging the conversation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryStage {
    /// Working through the fixed question script.
    Questions,
    /// Tenant is trying the self-help suggestions.
    Diy,
    /// Escalated; an incident record exists.
    Incident,
    /// Interview finished without escalation.
    Complete,
    /// Not started (also the home for unrecognized stage tags).
    #[default]
    #[serde(other)]
    None,
}

impl DiscoveryStage {
    /// Whether an inbound message belongs to an interview in progress.
    ///
    /// `Incident` is deliberately excluded: once escalated, only an explicit
    /// restart trigger re-enters the flow.
    pub fn is_mid_discovery(self) -> bool {
        matches!(self, Self::Questions | Self::Diy)
    }
}

impl fmt::Display for DiscoveryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Questions => write!(f, "questions"),
            Self::Diy => write!(f, "diy"),
            Self::Incident => write!(f, "incident"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// One recorded answer; insertion order is significant for audit/replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub key: String,
    pub value: String,
}

/// Full interview state for a single conversation.
///
/// Keyed strictly by conversation id, never shared across chat threads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryState {
    #[serde(default)]
    pub stage: DiscoveryStage,
    /// Index of the question currently awaiting an answer.
    #[serde(default)]
    pub question_index: usize,
    /// Answers keyed by question key; exactly the questions already asked.
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
    /// Append-only answer log, insertion order preserved.
    #[serde(default)]
    pub history: Vec<AnswerRecord>,
    /// Joined answer text, set once the script completes.
    #[serde(default)]
    pub summary: Option<String>,
    /// Set in the same step that sets `summary`.
    #[serde(default)]
    pub classification: Option<Classification>,
    /// Outcome of the DIY stage once it resolves.
    #[serde(default)]
    pub diy_result: Option<String>,
}

impl DiscoveryState {
    /// Record an answer under `key`, in both the map and the ordered log.
    pub fn record_answer(&mut self, key: &str, value: &str) {
        self.answers.insert(key.to_string(), value.to_string());
        self.history.push(AnswerRecord {
            key: key.to_string(),
            value: value.to_string(),
        });
    }
}
