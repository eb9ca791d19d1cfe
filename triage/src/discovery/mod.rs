//! The tenant interview as an explicit state machine.
//!
//! One inbound chat message produces exactly one transition. The engine is
//! purely reactive and performs no I/O: it consumes the stored
//! [`DiscoveryState`] plus the message text and returns the next state
//! together with a typed action for the caller to execute (ask a question,
//! offer DIY steps, close, or escalate). The caller persists the returned
//! state before doing anything else with it.
//!
//! # Transition table
//!
//! ```text
//! stage      │ trigger (lower-cased text)         │ action                     │ next
//! ───────────┼────────────────────────────────────┼────────────────────────────┼──────────
//! None       │ anything (state missing = restart) │ reset, ask question[0]     │ Questions
//! Complete   │ contains "start discovery"         │ reset, ask question[0]     │ Questions
//! Questions  │ index < N                          │ record answer, index += 1, │ Questions
//!            │                                    │ ask question[index]        │
//! Questions  │ index == N (same step as the final │ summarize, classify,       │ Diy
//!            │ answer; also covers stale state)   │ offer DIY suggestions      │
//! Diy        │ "resolve" present, "not" absent    │ diy_result = resolved      │ Complete
//! Diy        │ otherwise                          │ diy_result = unresolved,   │ Incident
//!            │                                    │ draft incident, bids,      │
//!            │                                    │ threshold decision         │
//! Incident   │ contains "start discovery"         │ reset, ask question[0]     │ Questions
//! anything   │ no matching row                    │ Ignore (state unchanged)   │ same
//! ```

pub mod engine;
pub mod script;
pub mod state;

pub use engine::{DiscoveryEngine, DiscoveryTurn, EscalationPlan, TurnAction};
pub use script::{question, DiscoveryQuestion, DISCOVERY_SCRIPT};
pub use state::{AnswerRecord, DiscoveryStage, DiscoveryState};
