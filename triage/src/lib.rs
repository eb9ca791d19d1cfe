//! Deterministic triage core for the maintenance intake agent.
//!
//! This crate holds everything that can be decided without talking to the
//! outside world:
//! - keyword classification of a reported issue into category / severity /
//!   urgency
//! - the fixed DIY suggestion tables offered before escalating
//! - the contractor bid stub and the cost-threshold approval policy
//! - the incident entity and its landlord-facing summary
//! - the discovery state machine that drives a tenant interview from first
//!   contact to resolution or escalation
//!
//! No module in this crate performs I/O, calls an LLM, or reads the clock
//! (incident timestamps are stamped by the recorder in `intake-agent`).
//! The `intake-agent` crate owns all collaborator seams and feeds inbound
//! chat messages through [`discovery::DiscoveryEngine`].

#![allow(clippy::uninlined_format_args)]

pub mod bids;
pub mod classify;
pub mod discovery;
pub mod diy;
pub mod incident;
pub mod threshold;

pub use bids::{contractor_bids, ContractorBid};
pub use classify::{classify, Classification, IssueCategory, Severity, Urgency};
pub use discovery::{
    question, AnswerRecord, DiscoveryEngine, DiscoveryQuestion, DiscoveryStage, DiscoveryState,
    DiscoveryTurn, EscalationPlan, TurnAction, DISCOVERY_SCRIPT,
};
pub use diy::suggestions;
pub use incident::{landlord_summary, new_incident_id, Incident, IncidentDraft};
pub use threshold::{ApprovalDecision, ApprovalThresholds};
