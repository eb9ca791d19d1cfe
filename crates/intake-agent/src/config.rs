//! Agent configuration, read from the environment with workable defaults.

use std::env;

use triage::ApprovalThresholds;

/// OpenAI-compatible completion endpoint.
#[derive(Debug, Clone)]
pub struct LlmEndpoint {
    pub url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
}

/// Top-level intake agent configuration.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// User id the agent posts under; inbound messages from this id are
    /// dropped to prevent reply loops.
    pub agent_user_id: String,
    pub agent_display_name: String,
    /// Default persona steering the reply composer.
    pub agent_persona: String,
    /// Base system instructions for the text generator.
    pub system_prompt: String,
    /// Shared secret for webhook signature verification. Absent means the
    /// webhook path rejects every delivery as not configured.
    pub webhook_secret: Option<String>,
    /// Completion endpoint; without one, replies degrade to the offline
    /// placeholder.
    pub llm_endpoint: Option<LlmEndpoint>,
    pub thresholds: ApprovalThresholds,
    /// How many recent messages feed the composer's context window.
    pub context_limit: usize,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            agent_user_id: env::var("INTAKE_AGENT_USER_ID")
                .unwrap_or_else(|_| "intake-agent".into()),
            agent_display_name: env::var("INTAKE_AGENT_NAME")
                .unwrap_or_else(|_| "Maintenance Agent".into()),
            agent_persona: env::var("INTAKE_AGENT_PERSONA").unwrap_or_else(|_| "assistant".into()),
            system_prompt: env::var("INTAKE_SYSTEM_PROMPT").unwrap_or_else(|_| {
                "You are a helpful property maintenance assistant. Provide concise, \
                 actionable guidance for tenants and landlords."
                    .into()
            }),
            webhook_secret: env::var("INTAKE_WEBHOOK_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            llm_endpoint: Self::llm_from_env(),
            thresholds: ApprovalThresholds {
                low: Self::threshold_var("INTAKE_THRESHOLD_LOW", 200.0),
                medium: Self::threshold_var("INTAKE_THRESHOLD_MEDIUM", 500.0),
                high: Self::threshold_var("INTAKE_THRESHOLD_HIGH", 999_999.0),
            },
            context_limit: env::var("INTAKE_CONTEXT_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }
}

impl IntakeConfig {
    fn llm_from_env() -> Option<LlmEndpoint> {
        let url = env::var("INTAKE_LLM_URL").ok()?;
        let model = env::var("INTAKE_LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        let api_key = env::var("INTAKE_LLM_API_KEY").ok();
        let temperature = env::var("INTAKE_LLM_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.2);
        Some(LlmEndpoint {
            url,
            model,
            api_key,
            temperature,
        })
    }

    fn threshold_var(name: &str, default: f64) -> f64 {
        env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
