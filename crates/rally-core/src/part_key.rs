//! Semantic part keys and the ordered keyword rules that derive them from part names

use serde::{Deserialize, Serialize};

use crate::text::normalize;

/// Coarse vehicle region a part or mesh belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartKey {
    Front,
    Rear,
    Handlebar,
    Engine,
    Exhaust,
    Tank,
    Frame,
    Seat,
    Signals,
    Radiator,
}

impl PartKey {
    pub const ALL: [PartKey; 10] = [
        PartKey::Front,
        PartKey::Rear,
        PartKey::Handlebar,
        PartKey::Engine,
        PartKey::Exhaust,
        PartKey::Tank,
        PartKey::Frame,
        PartKey::Seat,
        PartKey::Signals,
        PartKey::Radiator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartKey::Front => "front",
            PartKey::Rear => "rear",
            PartKey::Handlebar => "handlebar",
            PartKey::Engine => "engine",
            PartKey::Exhaust => "exhaust",
            PartKey::Tank => "tank",
            PartKey::Frame => "frame",
            PartKey::Seat => "seat",
            PartKey::Signals => "signals",
            PartKey::Radiator => "radiator",
        }
    }
}

impl std::fmt::Display for PartKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A keyword rule: the key applies when any keyword is a substring of the
/// normalized part name.
#[derive(Debug, Clone, Copy)]
pub struct KeyRule {
    pub key: PartKey,
    pub keywords: &'static [&'static str],
}

/// Rules in evaluation order. The first matching rule wins, so rule order
/// decides names that hit several rules ("Exhaust Guard" is exhaust, not frame).
pub const KEY_RULES: [KeyRule; 10] = [
    KeyRule {
        key: PartKey::Exhaust,
        keywords: &["exhaust", "header", "pipe", "muffler"],
    },
    KeyRule {
        key: PartKey::Handlebar,
        keywords: &[
            "handlebar", "bar", "grip", "lever", "switch", "damper", "steering", "mirror",
        ],
    },
    KeyRule {
        key: PartKey::Front,
        keywords: &["front", "fork", "caliper", "disc", "axle", "tow", "lug"],
    },
    KeyRule {
        key: PartKey::Rear,
        keywords: &["rear", "sprocket", "chain", "mudguard", "swing", "disc", "axle"],
    },
    KeyRule {
        key: PartKey::Radiator,
        keywords: &["radiator", "hose"],
    },
    KeyRule {
        key: PartKey::Tank,
        keywords: &["tank", "fuel", "gas", "vent", "cap"],
    },
    KeyRule {
        key: PartKey::Engine,
        keywords: &["clutch", "water pump", "oil", "ecu", "map", "filter"],
    },
    KeyRule {
        key: PartKey::Signals,
        keywords: &["signal", "light", "gopro", "tail"],
    },
    KeyRule {
        key: PartKey::Seat,
        keywords: &["seat"],
    },
    KeyRule {
        key: PartKey::Frame,
        keywords: &["frame", "guard", "bash", "peg", "triple clamp"],
    },
];

/// Classify a free-text part name. Falls back to [`PartKey::Frame`].
pub fn classify(part_name: &str) -> PartKey {
    let lowered = normalize(part_name);
    KEY_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|rule| rule.key)
        .unwrap_or(PartKey::Frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhaust_precedes_frame() {
        assert_eq!(classify("Exhaust Guard"), PartKey::Exhaust);
        assert_eq!(classify("Bash Guard"), PartKey::Frame);
    }

    #[test]
    fn test_substring_not_token_match() {
        // "handlebar" contains "bar"; "Crossbar Pad" hits the handlebar rule through "bar"
        assert_eq!(classify("Handlebar Grip"), PartKey::Handlebar);
        assert_eq!(classify("Crossbar Pad"), PartKey::Handlebar);
        // "Fuel Cap" hits tank
        assert_eq!(classify("Fuel Cap"), PartKey::Tank);
    }

    #[test]
    fn test_shared_keywords_resolve_to_first_rule() {
        // "disc" and "axle" appear in both front and rear; front is listed first
        assert_eq!(classify("Brake Disc"), PartKey::Front);
        assert_eq!(classify("Rear Brake Disc"), PartKey::Front);
        assert_eq!(classify("Rear Sprocket"), PartKey::Rear);
    }

    #[test]
    fn test_multi_word_keywords() {
        assert_eq!(classify("Water Pump Cover"), PartKey::Engine);
        assert_eq!(classify("Triple Clamp"), PartKey::Frame);
        assert_eq!(classify("Radiator Hose"), PartKey::Radiator);
    }

    #[test]
    fn test_punctuation_is_normalized() {
        assert_eq!(classify("Oil_Filter"), PartKey::Engine);
        assert_eq!(classify("SEAT (comfort)"), PartKey::Seat);
    }

    #[test]
    fn test_fallback_is_frame() {
        assert_eq!(classify("Custom Part XYZ"), PartKey::Frame);
        assert_eq!(classify(""), PartKey::Frame);
    }

    #[test]
    fn test_examples_from_catalog() {
        assert_eq!(classify("Front Brake Caliper"), PartKey::Front);
        assert_eq!(classify("Tail Light"), PartKey::Signals);
        assert_eq!(classify("ECU"), PartKey::Engine);
    }
}
