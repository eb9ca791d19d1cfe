//! Contractor bid stub.
//!
//! Deterministic placeholder quotes until a real bidding marketplace is
//! wired in. Order is significant: the first entry is the lead bid whose
//! quote feeds the approval threshold decision.

use serde::{Deserialize, Serialize};

/// A single contractor quote. Generated on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractorBid {
    pub name: String,
    pub quote: f64,
    pub eta: String,
}

/// Generate the fixed three-vendor bid sheet for a category.
///
/// Plumbing work prices off a 150 base; everything else off 220.
pub fn contractor_bids(category: &str) -> Vec<ContractorBid> {
    let base = if category == "plumbing" { 150.0 } else { 220.0 };
    vec![
        ContractorBid {
            name: "RapidFix".to_string(),
            quote: base,
            eta: "Next business day".to_string(),
        },
        ContractorBid {
            name: "Prime Contractors".to_string(),
            quote: base + 45.0,
            eta: "48 hours".to_string(),
        },
        ContractorBid {
            name: "SafeHome Pros".to_string(),
            quote: base + 90.0,
            eta: "Same week".to_string(),
        },
    ]
}
