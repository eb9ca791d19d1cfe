//! Webhook dispatch: authenticate, filter, run the discovery engine,
//! persist, reply.
//!
//! The dispatcher is the boundary the surrounding HTTP layer calls with a
//! raw delivery. Checks happen strictly in order (secret present, signature
//! valid, body parseable) before any state is read or written, so replaying
//! junk at the endpoint can never mutate a conversation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use triage::discovery::engine::START_TRIGGER;
use triage::{landlord_summary, DiscoveryEngine, DiscoveryState, TurnAction};

use crate::collaborators::{
    ContextReader, ConversationStore, IncidentStore, MessagingTransport, TextGenerator,
};
use crate::composer::ReplyComposer;
use crate::config::IntakeConfig;
use crate::error::IntakeError;
use crate::recorder::IncidentRecorder;
use crate::signature::verify_signature;

/// Event type the intake flow reacts to; everything else is ignored.
const NEW_MESSAGE_EVENT: &str = "message.new";

/// Outcome of a verified, parsed delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchStatus {
    Ok,
    Ignored,
}

impl DispatchStatus {
    /// The wire body the HTTP layer answers with.
    pub fn body(self) -> serde_json::Value {
        serde_json::json!({ "status": self })
    }
}

/// Chat-platform webhook payload, narrowed to the fields the flow reads.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub channel_id: Option<String>,
    /// Top-level actor; fallback when the message carries no author.
    #[serde(default)]
    pub user: Option<EventUser>,
    #[serde(default)]
    pub message: Option<EventMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub user: Option<EventUser>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub asset_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Attachment {
    fn url(&self) -> Option<&str> {
        self.asset_url.as_deref().or(self.image_url.as_deref())
    }
}

impl WebhookEvent {
    fn sender(&self) -> Option<&EventUser> {
        self.message
            .as_ref()
            .and_then(|m| m.user.as_ref())
            .or(self.user.as_ref())
    }

    fn text(&self) -> &str {
        self.message
            .as_ref()
            .and_then(|m| m.text.as_deref())
            .unwrap_or("")
            .trim()
    }

    fn media(&self) -> Vec<String> {
        self.message
            .as_ref()
            .map(|m| {
                m.attachments
                    .iter()
                    .filter_map(|a| a.url())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Drives one webhook delivery end to end.
pub struct WebhookDispatcher {
    config: IntakeConfig,
    engine: DiscoveryEngine,
    composer: ReplyComposer,
    recorder: IncidentRecorder,
    store: Arc<dyn ConversationStore>,
    context: Arc<dyn ContextReader>,
    messaging: Arc<dyn MessagingTransport>,
}

impl WebhookDispatcher {
    pub fn new(
        config: IntakeConfig,
        store: Arc<dyn ConversationStore>,
        context: Arc<dyn ContextReader>,
        messaging: Arc<dyn MessagingTransport>,
        generator: Option<Arc<dyn TextGenerator>>,
        incidents: Arc<dyn IncidentStore>,
    ) -> Self {
        let engine = DiscoveryEngine::new(config.thresholds);
        let composer = ReplyComposer::new(
            generator,
            config.system_prompt.clone(),
            config.agent_persona.clone(),
        );
        let recorder = IncidentRecorder::new(incidents);
        Self {
            config,
            engine,
            composer,
            recorder,
            store,
            context,
            messaging,
        }
    }

    /// Process one raw delivery. Authentication precedes parsing, parsing
    /// precedes any state access.
    pub async fn dispatch(
        &self,
        body: &[u8],
        signature: &str,
    ) -> Result<DispatchStatus, IntakeError> {
        let secret = self
            .config
            .webhook_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(IntakeError::NotConfigured("INTAKE_WEBHOOK_SECRET"))?;
        if !verify_signature(body, signature, secret) {
            return Err(IntakeError::Unauthorized);
        }

        let event: WebhookEvent = serde_json::from_slice(body)?;
        if event.kind != NEW_MESSAGE_EVENT {
            debug!(kind = %event.kind, "ignoring event type");
            return Ok(DispatchStatus::Ignored);
        }

        let Some(channel_id) = event.channel_id.as_deref().filter(|c| !c.is_empty()) else {
            return Ok(DispatchStatus::Ignored);
        };
        let sender = event.sender();
        let sender_id = sender.and_then(|u| u.id.as_deref()).unwrap_or("");
        if sender_id == self.config.agent_user_id {
            // The agent hears its own posts back; never answer them.
            return Ok(DispatchStatus::Ignored);
        }
        let text = event.text();
        if text.is_empty() {
            return Ok(DispatchStatus::Ignored);
        }

        let stored = self
            .store
            .get_state(channel_id)
            .await
            .map_err(IntakeError::Store)?;
        let mid_discovery = stored
            .as_ref()
            .map(|s| s.stage.is_mid_discovery())
            .unwrap_or(false);
        if !mid_discovery && !text.to_lowercase().contains(START_TRIGGER) {
            return Ok(DispatchStatus::Ignored);
        }

        let recent = self
            .context
            .recent_messages(channel_id, self.config.context_limit)
            .await
            .map_err(IntakeError::Messaging)?;
        let context = ReplyComposer::build_context(&recent, self.config.context_limit);
        let context = (!context.is_empty()).then_some(context);

        let turn = self.engine.step(stored.unwrap_or_default(), text);
        info!(
            channel = %channel_id,
            stage = %turn.state.stage,
            "discovery turn processed"
        );

        match turn.action {
            TurnAction::Ignore => Ok(DispatchStatus::Ignored),

            TurnAction::AskQuestion { index, prompt } => {
                self.persist(channel_id, &turn.state).await?;
                debug!(index, "asking scripted question");
                self.post(channel_id, &prompt).await?;
                Ok(DispatchStatus::Ok)
            }

            TurnAction::OfferDiy {
                classification,
                suggestions,
            } => {
                self.persist(channel_id, &turn.state).await?;
                let steps = suggestions
                    .iter()
                    .enumerate()
                    .map(|(i, s)| format!("{}. {}", i + 1, s))
                    .collect::<Vec<_>>()
                    .join("\n");
                let instruction = format!(
                    "The tenant reported a {} issue (severity {}, urgency {}). \
                     Walk them through these self-help steps and ask them to reply \
                     'resolved' or 'not resolved' after trying:\n{}",
                    classification.category, classification.severity, classification.urgency, steps
                );
                let reply = self
                    .composer
                    .compose(&instruction, context.as_deref(), None)
                    .await;
                self.post(channel_id, &reply).await?;
                Ok(DispatchStatus::Ok)
            }

            TurnAction::CloseResolved => {
                self.persist(channel_id, &turn.state).await?;
                let reply = self
                    .composer
                    .compose(
                        "Tell the tenant you're glad the issue is resolved, and that they \
                         can say 'start discovery' any time it comes back.",
                        context.as_deref(),
                        None,
                    )
                    .await;
                self.post(channel_id, &reply).await?;
                Ok(DispatchStatus::Ok)
            }

            TurnAction::Escalate(plan) => {
                let tenant = sender
                    .and_then(|u| u.email.as_deref().or(u.id.as_deref()))
                    .unwrap_or("unknown");
                // Persist only after the incident exists: a failed write
                // must not strand a half-escalated conversation.
                let incident = self
                    .recorder
                    .create(channel_id, tenant, plan.draft, event.media())
                    .await?;
                self.persist(channel_id, &turn.state).await?;

                let bid_lines = plan
                    .bids
                    .iter()
                    .map(|b| format!("- {}: ${:.0} ({})", b.name, b.quote, b.eta))
                    .collect::<Vec<_>>()
                    .join("\n");
                let instruction = format!(
                    "Tell the tenant a maintenance incident has been filed and a \
                     contractor will be arranged. Share this summary and the sample \
                     bids.\n\n{}\n\nSample bids:\n{}\n\nApproval recommendation: {}",
                    landlord_summary(&incident),
                    bid_lines,
                    plan.decision
                );
                let reply = self
                    .composer
                    .compose(&instruction, context.as_deref(), None)
                    .await;
                self.post(channel_id, &reply).await?;
                Ok(DispatchStatus::Ok)
            }
        }
    }

    async fn persist(&self, channel_id: &str, state: &DiscoveryState) -> Result<(), IntakeError> {
        self.store
            .set_state(channel_id, state)
            .await
            .map_err(IntakeError::Store)
    }

    async fn post(&self, channel_id: &str, text: &str) -> Result<(), IntakeError> {
        self.messaging
            .post_message(channel_id, text)
            .await
            .map_err(IntakeError::Messaging)
    }
}
