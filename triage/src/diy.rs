//! Self-help suggestions offered before an issue escalates to contractors.
//!
//! Static lookup table keyed by category string. The table is configuration:
//! editing a suggestion must never require touching the state machine.

/// DIY suggestions for a category, in the order they should be presented.
///
/// Unknown categories get a single evidence-gathering fallback so the
/// conversation can still move forward on media alone.
pub fn suggestions(category: &str) -> Vec<&'static str> {
    match category {
        "plumbing" => vec![
            "Tighten any visible fittings slightly with a wrench.",
            "Place a bucket under the leak and turn off nearby valves.",
            "Dry the area and check if the leak persists.",
        ],
        "electrical" => vec![
            "Turn off the breaker controlling the outlet.",
            "Inspect for scorch marks; do not touch exposed wires.",
        ],
        _ => vec!["Please gather photos or short videos to help diagnose."],
    }
}
