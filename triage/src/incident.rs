//! The incident entity and its landlord-facing summary.
//!
//! An incident is created at most once per escalation and is immutable in
//! this crate afterwards; status transitions belong to the job/approval
//! subsystem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::{IssueCategory, Severity, Urgency};

/// A recorded, escalated maintenance issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub incident_id: String,
    pub thread_id: String,
    pub tenant_email: String,
    pub category: IssueCategory,
    pub severity: Severity,
    pub urgency: Urgency,
    pub summary: String,
    pub diy_attempted: bool,
    pub diy_result: Option<String>,
    /// Attachment references gathered during discovery, possibly empty.
    pub media: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// Initial value "pending"; later transitions owned by the job subsystem.
    pub status: String,
}

/// Pure escalation payload produced by the discovery engine.
///
/// Carries everything the recorder needs except provenance and media,
/// which only the dispatcher knows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentDraft {
    /// Caller-supplied id; generated when absent.
    pub incident_id: Option<String>,
    pub category: IssueCategory,
    pub severity: Severity,
    pub urgency: Urgency,
    pub summary: String,
    pub diy_attempted: bool,
    pub diy_result: Option<String>,
}

/// Generate a fresh collision-resistant incident id.
pub fn new_incident_id() -> String {
    format!("INC-{}", Uuid::new_v4())
}

/// Render the fixed summary block shown to the landlord.
pub fn landlord_summary(incident: &Incident) -> String {
    format!(
        "Issue Summary:\n\
         - Category: {}\n\
         - Severity: {}\n\
         - Urgency: {}\n\
         - DIY Attempted: {}\n\
         - DIY Result: {}\n\
         - Description: {}\n\
         Incident ID: {}",
        incident.category,
        incident.severity,
        incident.urgency,
        incident.diy_attempted,
        incident.diy_result.as_deref().unwrap_or("n/a"),
        incident.summary,
        incident.incident_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_incident() -> Incident {
        Incident {
            incident_id: "INC-test".to_string(),
            thread_id: "thread-1".to_string(),
            tenant_email: "tenant@example.com".to_string(),
            category: IssueCategory::Plumbing,
            severity: Severity::Medium,
            urgency: Urgency::Immediate,
            summary: "issue: leak under sink".to_string(),
            diy_attempted: true,
            diy_result: Some("Unresolved".to_string()),
            media: vec![],
            created_at: Utc::now(),
            status: "pending".to_string(),
        }
    }

    #[test]
    fn incident_ids_are_prefixed_and_unique() {
        let a = new_incident_id();
        let b = new_incident_id();
        assert!(a.starts_with("INC-"));
        assert_ne!(a, b);
    }

    #[test]
    fn landlord_summary_carries_every_field() {
        let text = landlord_summary(&sample_incident());
        assert!(text.starts_with("Issue Summary:"));
        assert!(text.contains("- Category: plumbing"));
        assert!(text.contains("- Severity: medium"));
        assert!(text.contains("- Urgency: immediate"));
        assert!(text.contains("- DIY Attempted: true"));
        assert!(text.contains("- DIY Result: Unresolved"));
        assert!(text.contains("Incident ID: INC-test"));
    }

    #[test]
    fn missing_diy_result_renders_na() {
        let mut incident = sample_incident();
        incident.diy_result = None;
        assert!(landlord_summary(&incident).contains("- DIY Result: n/a"));
    }

    #[test]
    fn incident_serde_roundtrip() {
        let incident = sample_incident();
        let json = serde_json::to_string(&incident).unwrap();
        let restored: Incident = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, incident);
    }
}
