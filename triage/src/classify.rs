//! Keyword classification of a reported issue.
//!
//! Deliberately not a model: a fixed, case-insensitive substring rule set
//! whose keyword list and priority order are part of the product contract.
//! Unmatched text defaults to plumbing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Contractor pool an issue routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    Plumbing,
    Electrical,
}

impl IssueCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plumbing => "plumbing",
            Self::Electrical => "electrical",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How bad the damage is.
///
/// The classifier only ever emits `Medium` or `High`; `Low` exists for
/// incident records downgraded by other subsystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// How quickly someone needs to look at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Routine,
    Immediate,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Routine => write!(f, "routine"),
            Self::Immediate => write!(f, "immediate"),
        }
    }
}

/// Result of classifying an issue summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: IssueCategory,
    pub severity: Severity,
    pub urgency: Urgency,
}

/// Severity/urgency keywords, checked in declared order; first match wins.
/// Multiple matches are never merged.
const SEVERITY_KEYWORDS: [(&str, Severity, Urgency); 3] = [
    ("flood", Severity::High, Urgency::Immediate),
    ("gas", Severity::High, Urgency::Immediate),
    ("leak", Severity::Medium, Urgency::Immediate),
];

/// Classify an issue summary into category, severity, and urgency.
pub fn classify(summary: &str) -> Classification {
    let text = summary.to_lowercase();

    let category = if text.contains("electrical") || text.contains("outlet") {
        IssueCategory::Electrical
    } else {
        IssueCategory::Plumbing
    };

    let mut severity = Severity::Medium;
    let mut urgency = Urgency::Routine;
    for (keyword, sev, urg) in SEVERITY_KEYWORDS {
        if text.contains(keyword) {
            severity = sev;
            urgency = urg;
            break;
        }
    }

    Classification {
        category,
        severity,
        urgency,
    }
}
