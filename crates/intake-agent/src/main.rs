use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use intake_agent::collaborators::TextGenerator;
use intake_agent::memory::{MemoryConversation, MemoryIncidentLog};
use intake_agent::{llm_bridge, signature, CompletionClient, IntakeConfig, WebhookDispatcher};

#[derive(Debug, Parser)]
#[command(name = "intake-agent", about = "Maintenance intake agent")]
struct Args {
    /// Run a scripted tenant conversation against in-memory collaborators
    /// instead of waiting for webhook deliveries.
    #[arg(long)]
    simulate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let config = IntakeConfig::default();
    info!(agent = %config.agent_user_id, "intake agent starting");

    if args.simulate {
        return simulate(config).await;
    }

    match &config.llm_endpoint {
        Some(endpoint) => {
            if llm_bridge::check_endpoint(&endpoint.url).await {
                info!(url = %endpoint.url, model = %endpoint.model, "completion endpoint reachable");
            } else {
                warn!(url = %endpoint.url, "completion endpoint unreachable; replies will use the offline fallback");
            }
        }
        None => warn!("INTAKE_LLM_URL not set; replies will use the offline fallback"),
    }
    if config.webhook_secret.is_none() {
        warn!("INTAKE_WEBHOOK_SECRET not set; webhook deliveries will be rejected as not configured");
    }

    info!("ready; feed webhook deliveries to WebhookDispatcher::dispatch");
    Ok(())
}

/// Walk one scripted escalation end to end and log the transcript.
async fn simulate(mut config: IntakeConfig) -> Result<()> {
    let secret = config
        .webhook_secret
        .get_or_insert_with(|| "simulation-secret".to_string())
        .clone();

    let conversation = Arc::new(MemoryConversation::new(config.agent_display_name.clone()));
    let incidents = Arc::new(MemoryIncidentLog::default());
    let generator = config
        .llm_endpoint
        .as_ref()
        .map(|endpoint| Arc::new(CompletionClient::new(endpoint)) as Arc<dyn TextGenerator>);
    if generator.is_none() {
        warn!("no completion endpoint; simulated replies use the offline fallback");
    }

    let dispatcher = WebhookDispatcher::new(
        config,
        conversation.clone(),
        conversation.clone(),
        conversation.clone(),
        generator,
        incidents.clone(),
    );

    let lines = [
        "@agent start discovery",
        "water is leaking under the kitchen sink",
        "the kitchen, below the counter",
        "since last night, and it is getting worse",
        "yes, the area is safe and accessible",
        "tried the steps, not resolved",
    ];
    for line in lines {
        conversation.say("sim-thread", "tenant", line);
        let body = serde_json::to_vec(&serde_json::json!({
            "type": "message.new",
            "channel_id": "sim-thread",
            "user": { "id": "tenant@example.com", "name": "Tenant" },
            "message": { "text": line },
        }))?;
        let sig = signature::sign(&body, &secret).context("failed to sign simulated delivery")?;
        let status = dispatcher.dispatch(&body, &sig).await?;
        info!(text = %line, status = ?status, "delivered");
    }

    for message in conversation.messages("sim-thread") {
        info!(speaker = %message.speaker, text = %message.text, "transcript");
    }
    for incident in incidents.incidents() {
        info!(
            id = %incident.incident_id,
            category = %incident.category,
            status = %incident.status,
            "incident recorded"
        );
    }
    Ok(())
}
