//! The fixed discovery interview script.
//!
//! Configuration, not runtime state: the state machine stores answers under
//! these keys and finalizes once every question has been asked.

/// A single scripted interview question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryQuestion {
    /// Stable key the answer is recorded under.
    pub key: &'static str,
    /// Prompt posted to the tenant, verbatim.
    pub prompt: &'static str,
}

/// The interview, in asking order.
pub const DISCOVERY_SCRIPT: &[DiscoveryQuestion] = &[
    DiscoveryQuestion {
        key: "issue",
        prompt: "What seems to be the problem? Describe what you're seeing.",
    },
    DiscoveryQuestion {
        key: "location",
        prompt: "Where in the property is the issue located?",
    },
    DiscoveryQuestion {
        key: "onset",
        prompt: "When did you first notice it, and has it gotten worse?",
    },
    DiscoveryQuestion {
        key: "access",
        prompt: "Is the area safe to approach, and can a contractor access it?",
    },
];

/// Question at `index`, or `None` once the script is exhausted.
pub fn question(index: usize) -> Option<&'static DiscoveryQuestion> {
    DISCOVERY_SCRIPT.get(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_keys_are_unique() {
        let mut keys: Vec<_> = DISCOVERY_SCRIPT.iter().map(|q| q.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), DISCOVERY_SCRIPT.len());
    }

    #[test]
    fn lookup_past_the_end_is_none() {
        assert!(question(DISCOVERY_SCRIPT.len()).is_none());
        assert_eq!(question(0).unwrap().key, "issue");
    }
}
