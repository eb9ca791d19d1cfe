//! Incident recording.
//!
//! Turns the engine's escalation draft into the canonical incident entity
//! and hands it to the persistence collaborator. A failed write surfaces
//! to the caller; transient fallbacks, if any, belong to layers outside
//! this crate.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use triage::{new_incident_id, Incident, IncidentDraft};

use crate::collaborators::IncidentStore;
use crate::error::IntakeError;

pub struct IncidentRecorder {
    store: Arc<dyn IncidentStore>,
}

impl IncidentRecorder {
    pub fn new(store: Arc<dyn IncidentStore>) -> Self {
        Self { store }
    }

    /// Build and persist the incident for an escalation. The record is
    /// immutable from this crate's point of view once stored.
    pub async fn create(
        &self,
        thread_id: &str,
        tenant_email: &str,
        draft: IncidentDraft,
        media: Vec<String>,
    ) -> Result<Incident, IntakeError> {
        let incident = Incident {
            incident_id: draft.incident_id.unwrap_or_else(new_incident_id),
            thread_id: thread_id.to_string(),
            tenant_email: tenant_email.to_string(),
            category: draft.category,
            severity: draft.severity,
            urgency: draft.urgency,
            summary: draft.summary,
            diy_attempted: draft.diy_attempted,
            diy_result: draft.diy_result,
            media,
            created_at: Utc::now(),
            status: "pending".to_string(),
        };

        self.store
            .put_incident(&incident)
            .await
            .map_err(IntakeError::Persistence)?;

        info!(
            incident_id = %incident.incident_id,
            category = %incident.category,
            urgency = %incident.urgency,
            "incident recorded"
        );
        Ok(incident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::MockIncidentStore;
    use triage::{IssueCategory, Severity, Urgency};

    fn draft() -> IncidentDraft {
        IncidentDraft {
            incident_id: None,
            category: IssueCategory::Electrical,
            severity: Severity::Medium,
            urgency: Urgency::Routine,
            summary: "issue: outlet sparking".to_string(),
            diy_attempted: true,
            diy_result: Some("Unresolved".to_string()),
        }
    }

    #[tokio::test]
    async fn create_fills_id_timestamp_and_pending_status() {
        let mut store = MockIncidentStore::new();
        store
            .expect_put_incident()
            .withf(|incident| {
                incident.status == "pending"
                    && incident.incident_id.starts_with("INC-")
                    && incident.thread_id == "thread-9"
            })
            .returning(|_| Ok(()));

        let recorder = IncidentRecorder::new(Arc::new(store));
        let incident = recorder
            .create("thread-9", "tenant@example.com", draft(), vec![])
            .await
            .unwrap();

        assert_eq!(incident.tenant_email, "tenant@example.com");
        assert_eq!(incident.category, IssueCategory::Electrical);
        assert!(incident.media.is_empty());
    }

    #[tokio::test]
    async fn supplied_id_is_kept() {
        let mut store = MockIncidentStore::new();
        store.expect_put_incident().returning(|_| Ok(()));

        let recorder = IncidentRecorder::new(Arc::new(store));
        let mut d = draft();
        d.incident_id = Some("INC-fixed".to_string());
        let incident = recorder
            .create("thread-9", "tenant@example.com", d, vec![])
            .await
            .unwrap();
        assert_eq!(incident.incident_id, "INC-fixed");
    }

    #[tokio::test]
    async fn persistence_failure_surfaces_to_the_caller() {
        let mut store = MockIncidentStore::new();
        store
            .expect_put_incident()
            .returning(|_| Err(anyhow::anyhow!("table offline")));

        let recorder = IncidentRecorder::new(Arc::new(store));
        let err = recorder
            .create("thread-9", "tenant@example.com", draft(), vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, IntakeError::Persistence(_)));
    }

    #[tokio::test]
    async fn media_references_are_kept_in_order() {
        let mut store = MockIncidentStore::new();
        store.expect_put_incident().returning(|_| Ok(()));

        let recorder = IncidentRecorder::new(Arc::new(store));
        let incident = recorder
            .create(
                "thread-9",
                "tenant@example.com",
                draft(),
                vec!["https://cdn/a.jpg".into(), "https://cdn/b.mp4".into()],
            )
            .await
            .unwrap();
        assert_eq!(incident.media[0], "https://cdn/a.jpg");
        assert_eq!(incident.media[1], "https://cdn/b.mp4");
    }
}
