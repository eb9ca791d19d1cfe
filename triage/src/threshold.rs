//! Cost-threshold approval policy.
//!
//! Maps an estimated repair cost to the approval workflow action the
//! landlord side should take. Thresholds are per-environment configuration,
//! carried on a struct rather than baked into the decision function.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Approval workflow action for an estimated repair cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApprovalDecision {
    AutoApprove,
    RecommendedReview,
    ManualApproval,
}

impl fmt::Display for ApprovalDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AutoApprove => write!(f, "auto-approve"),
            Self::RecommendedReview => write!(f, "recommended-review"),
            Self::ManualApproval => write!(f, "manual-approval"),
        }
    }
}

/// Ascending cost bands, compared inclusively.
///
/// Quotes beyond `high` still resolve to manual approval; there is no
/// separate reject outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApprovalThresholds {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl Default for ApprovalThresholds {
    fn default() -> Self {
        Self {
            low: 200.0,
            medium: 500.0,
            high: 999_999.0,
        }
    }
}

impl ApprovalThresholds {
    pub fn decide(&self, quote: f64) -> ApprovalDecision {
        if quote <= self.low {
            ApprovalDecision::AutoApprove
        } else if quote <= self.medium {
            ApprovalDecision::RecommendedReview
        } else {
            ApprovalDecision::ManualApproval
        }
    }
}
