//! The discovery engine: one inbound message, one transition.
//!
//! Pure decision logic; the caller owns persistence and messaging. Every
//! branch mirrors a row of the transition table in the module docs. If no
//! row matches, the engine returns [`TurnAction::Ignore`] with the state
//! untouched.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bids::{contractor_bids, ContractorBid};
use crate::classify::{classify, Classification};
use crate::discovery::script::{question, DISCOVERY_SCRIPT};
use crate::discovery::state::{DiscoveryStage, DiscoveryState};
use crate::diy::suggestions;
use crate::incident::IncidentDraft;
use crate::threshold::{ApprovalDecision, ApprovalThresholds};

/// Phrase that (re)starts the interview.
pub const START_TRIGGER: &str = "start discovery";

/// Everything the caller needs to execute an escalation:
/// the incident draft, the bid sheet, and the approval decision computed
/// from the lead bid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationPlan {
    pub draft: IncidentDraft,
    pub bids: Vec<ContractorBid>,
    pub decision: ApprovalDecision,
}

/// Typed side effect the caller executes after persisting the new state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnAction {
    /// Post the scripted question at `index`.
    AskQuestion { index: usize, prompt: String },
    /// Present DIY suggestions and ask the tenant to confirm resolution.
    OfferDiy {
        classification: Classification,
        suggestions: Vec<String>,
    },
    /// Tenant confirmed the DIY steps worked; acknowledge and close.
    CloseResolved,
    /// DIY failed: create the incident and notify with bids + decision.
    Escalate(EscalationPlan),
    /// No transition row matched; state is unchanged.
    Ignore,
}

/// Result of processing one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryTurn {
    pub state: DiscoveryState,
    pub action: TurnAction,
}

/// Pure state machine over [`DiscoveryState`].
#[derive(Debug, Clone, Default)]
pub struct DiscoveryEngine {
    thresholds: ApprovalThresholds,
}

impl DiscoveryEngine {
    pub fn new(thresholds: ApprovalThresholds) -> Self {
        Self { thresholds }
    }

    /// Process one inbound message and produce the next state plus action.
    ///
    /// The returned state must be persisted by the caller before the
    /// conversation takes another turn.
    pub fn step(&self, state: DiscoveryState, text: &str) -> DiscoveryTurn {
        let trigger = text.to_lowercase();
        let from = state.stage;

        let turn = match state.stage {
            DiscoveryStage::None => Self::restart(),
            DiscoveryStage::Complete | DiscoveryStage::Incident => {
                if trigger.contains(START_TRIGGER) {
                    Self::restart()
                } else {
                    DiscoveryTurn {
                        state,
                        action: TurnAction::Ignore,
                    }
                }
            }
            DiscoveryStage::Questions => self.answer_question(state, text),
            DiscoveryStage::Diy => self.resolve_diy(state, &trigger),
        };

        debug!(from = %from, to = %turn.state.stage, "discovery transition");
        turn
    }

    fn restart() -> DiscoveryTurn {
        let state = DiscoveryState {
            stage: DiscoveryStage::Questions,
            ..Default::default()
        };
        let first = &DISCOVERY_SCRIPT[0];
        DiscoveryTurn {
            state,
            action: TurnAction::AskQuestion {
                index: 0,
                prompt: first.prompt.to_string(),
            },
        }
    }

    fn answer_question(&self, mut state: DiscoveryState, text: &str) -> DiscoveryTurn {
        // Stale state can arrive with the index already past the script;
        // finalize without recording rather than indexing out of range.
        if let Some(current) = question(state.question_index) {
            state.record_answer(current.key, text.trim());
            state.question_index += 1;
        }

        if let Some(next) = question(state.question_index) {
            let action = TurnAction::AskQuestion {
                index: state.question_index,
                prompt: next.prompt.to_string(),
            };
            return DiscoveryTurn { state, action };
        }

        // Final answer and stage rollover happen in the same step.
        let summary = state
            .history
            .iter()
            .map(|record| format!("{}: {}", record.key, record.value))
            .collect::<Vec<_>>()
            .join("; ");
        let classification = classify(&summary);
        state.summary = Some(summary);
        state.classification = Some(classification);
        state.stage = DiscoveryStage::Diy;

        let steps = suggestions(classification.category.as_str())
            .into_iter()
            .map(str::to_string)
            .collect();
        DiscoveryTurn {
            state,
            action: TurnAction::OfferDiy {
                classification,
                suggestions: steps,
            },
        }
    }

    fn resolve_diy(&self, mut state: DiscoveryState, trigger: &str) -> DiscoveryTurn {
        if trigger.contains("resolve") && !trigger.contains("not") {
            state.diy_result = Some("Resolved via DIY".to_string());
            state.stage = DiscoveryStage::Complete;
            return DiscoveryTurn {
                state,
                action: TurnAction::CloseResolved,
            };
        }

        state.diy_result = Some("Unresolved".to_string());
        state.stage = DiscoveryStage::Incident;

        let summary = state.summary.clone().unwrap_or_default();
        // Classification is set when the script completes; re-derive it from
        // the summary if older state lost it.
        let classification = state
            .classification
            .unwrap_or_else(|| classify(&summary));

        let draft = IncidentDraft {
            incident_id: None,
            category: classification.category,
            severity: classification.severity,
            urgency: classification.urgency,
            summary,
            diy_attempted: true,
            diy_result: state.diy_result.clone(),
        };
        let bids = contractor_bids(classification.category.as_str());
        let decision = self.thresholds.decide(bids[0].quote);

        DiscoveryTurn {
            state,
            action: TurnAction::Escalate(EscalationPlan {
                draft,
                bids,
                decision,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{IssueCategory, Severity, Urgency};

    fn engine() -> DiscoveryEngine {
        DiscoveryEngine::new(ApprovalThresholds::default())
    }

    fn answered_through(engine: &DiscoveryEngine, answers: &[&str]) -> DiscoveryTurn {
        let mut turn = engine.step(DiscoveryState::default(), "start discovery");
        for answer in answers {
            turn = engine.step(turn.state, answer);
        }
        turn
    }

    #[test]
    fn start_trigger_resets_and_asks_first_question() {
        let stale = DiscoveryState {
            stage: DiscoveryStage::Complete,
            question_index: 3,
            summary: Some("old".to_string()),
            ..Default::default()
        };
        let turn = engine().step(stale, "please start discovery again");

        assert_eq!(turn.state.stage, DiscoveryStage::Questions);
        assert_eq!(turn.state.question_index, 0);
        assert!(turn.state.answers.is_empty());
        match turn.action {
            TurnAction::AskQuestion { index, ref prompt } => {
                assert_eq!(index, 0);
                assert_eq!(prompt, DISCOVERY_SCRIPT[0].prompt);
            }
            ref other => panic!("expected AskQuestion, got {other:?}"),
        }
    }

    #[test]
    fn missing_state_starts_without_the_trigger_phrase() {
        let turn = engine().step(DiscoveryState::default(), "hi there");
        assert_eq!(turn.state.stage, DiscoveryStage::Questions);
        assert!(matches!(turn.action, TurnAction::AskQuestion { index: 0, .. }));
    }

    #[test]
    fn complete_without_trigger_is_ignored() {
        let done = DiscoveryState {
            stage: DiscoveryStage::Complete,
            ..Default::default()
        };
        let turn = engine().step(done.clone(), "thanks!");
        assert_eq!(turn.action, TurnAction::Ignore);
        assert_eq!(turn.state, done);
    }

    #[test]
    fn answers_advance_through_the_script_in_order() {
        let eng = engine();
        let mut turn = eng.step(DiscoveryState::default(), "start discovery");
        turn = eng.step(turn.state, "water dripping from the ceiling");

        assert_eq!(turn.state.question_index, 1);
        assert_eq!(
            turn.state.answers["issue"],
            "water dripping from the ceiling"
        );
        assert_eq!(turn.state.history[0].key, "issue");
        match turn.action {
            TurnAction::AskQuestion { index: 1, ref prompt } => {
                assert_eq!(prompt, DISCOVERY_SCRIPT[1].prompt);
            }
            ref other => panic!("expected second question, got {other:?}"),
        }
    }

    #[test]
    fn final_answer_rolls_over_to_diy_in_the_same_step() {
        let turn = answered_through(
            &engine(),
            &["leak under the sink", "kitchen", "yesterday", "yes, safe"],
        );

        assert_eq!(turn.state.stage, DiscoveryStage::Diy);
        assert_eq!(turn.state.question_index, DISCOVERY_SCRIPT.len());
        let summary = turn.state.summary.as_deref().unwrap();
        assert!(summary.contains("issue: leak under the sink"));
        assert!(summary.contains("access: yes, safe"));

        let classification = turn.state.classification.expect("classification set");
        assert_eq!(classification.category, IssueCategory::Plumbing);
        assert_eq!(classification.urgency, Urgency::Immediate);

        match turn.action {
            TurnAction::OfferDiy {
                ref suggestions, ..
            } => assert_eq!(suggestions.len(), 3),
            ref other => panic!("expected OfferDiy, got {other:?}"),
        }
    }

    #[test]
    fn resolved_reply_closes_the_interview() {
        let eng = engine();
        let diy = answered_through(&eng, &["leak", "kitchen", "today", "yes"]);
        let turn = eng.step(diy.state, "Resolved, the bucket trick worked");

        assert_eq!(turn.state.stage, DiscoveryStage::Complete);
        assert_eq!(turn.state.diy_result.as_deref(), Some("Resolved via DIY"));
        assert_eq!(turn.action, TurnAction::CloseResolved);
    }

    #[test]
    fn not_resolved_escalates_with_bids_and_decision() {
        let eng = engine();
        let diy = answered_through(&eng, &["gas smell near the boiler", "hall", "now", "no"]);
        let turn = eng.step(diy.state, "not resolved, still smells");

        assert_eq!(turn.state.stage, DiscoveryStage::Incident);
        assert_eq!(turn.state.diy_result.as_deref(), Some("Unresolved"));
        match turn.action {
            TurnAction::Escalate(ref plan) => {
                assert_eq!(plan.draft.category, IssueCategory::Plumbing);
                assert_eq!(plan.draft.severity, Severity::High);
                assert!(plan.draft.diy_attempted);
                assert_eq!(plan.bids[0].name, "RapidFix");
                // Plumbing lead bid of 150 sits inside the auto-approve band.
                assert_eq!(plan.decision, ApprovalDecision::AutoApprove);
            }
            ref other => panic!("expected Escalate, got {other:?}"),
        }
    }

    #[test]
    fn resolve_inside_not_resolved_still_escalates() {
        let eng = engine();
        let diy = answered_through(&eng, &["leak", "bath", "today", "yes"]);
        let turn = eng.step(diy.state, "it did NOT resolve");
        assert_eq!(turn.state.stage, DiscoveryStage::Incident);
    }

    #[test]
    fn electrical_escalation_prices_off_220() {
        let eng = engine();
        let diy = answered_through(&eng, &["outlet sparking", "bedroom", "today", "yes"]);
        let turn = eng.step(diy.state, "no luck");

        match turn.action {
            TurnAction::Escalate(ref plan) => {
                assert_eq!(plan.draft.category, IssueCategory::Electrical);
                assert_eq!(plan.bids[0].quote, 220.0);
                assert_eq!(plan.decision, ApprovalDecision::RecommendedReview);
            }
            ref other => panic!("expected Escalate, got {other:?}"),
        }
    }

    #[test]
    fn stale_index_past_script_finalizes_instead_of_panicking() {
        let stale = DiscoveryState {
            stage: DiscoveryStage::Questions,
            question_index: DISCOVERY_SCRIPT.len() + 2,
            ..Default::default()
        };
        let turn = engine().step(stale, "whatever");
        assert_eq!(turn.state.stage, DiscoveryStage::Diy);
        assert!(turn.state.classification.is_some());
    }

    #[test]
    fn incident_stage_ignores_chatter_but_restarts_on_trigger() {
        let eng = engine();
        let escalated = DiscoveryState {
            stage: DiscoveryStage::Incident,
            ..Default::default()
        };
        let turn = eng.step(escalated.clone(), "any update?");
        assert_eq!(turn.action, TurnAction::Ignore);
        assert_eq!(turn.state.stage, DiscoveryStage::Incident);

        let turn = eng.step(escalated, "start discovery");
        assert_eq!(turn.state.stage, DiscoveryStage::Questions);
    }

    #[test]
    fn escalation_with_lost_classification_reclassifies_from_summary() {
        let state = DiscoveryState {
            stage: DiscoveryStage::Diy,
            summary: Some("issue: outlet buzzing; location: garage".to_string()),
            classification: None,
            ..Default::default()
        };
        let turn = engine().step(state, "nope");
        match turn.action {
            TurnAction::Escalate(ref plan) => {
                assert_eq!(plan.draft.category, IssueCategory::Electrical);
            }
            ref other => panic!("expected Escalate, got {other:?}"),
        }
    }
}
