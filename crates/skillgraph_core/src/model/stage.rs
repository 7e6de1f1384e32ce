//! Ordered proficiency stages a skill progresses through.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// One of the five canonical proficiency stages.
///
/// Ordering follows progression: `Foundation < Practitioner < ... < Master`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Foundation,
    Practitioner,
    Expert,
    Authority,
    Master,
}

impl Stage {
    /// All canonical stages in progression order.
    pub const ALL: [Stage; 5] = [
        Stage::Foundation,
        Stage::Practitioner,
        Stage::Expert,
        Stage::Authority,
        Stage::Master,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Foundation => "foundation",
            Self::Practitioner => "practitioner",
            Self::Expert => "expert",
            Self::Authority => "authority",
            Self::Master => "master",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "foundation" => Some(Self::Foundation),
            "practitioner" => Some(Self::Practitioner),
            "expert" => Some(Self::Expert),
            "authority" => Some(Self::Authority),
            "master" => Some(Self::Master),
            _ => None,
        }
    }

    /// Returns the following stage, or `None` at `Master`.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Foundation => Some(Self::Practitioner),
            Self::Practitioner => Some(Self::Expert),
            Self::Expert => Some(Self::Authority),
            Self::Authority => Some(Self::Master),
            Self::Master => None,
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Stage;

    #[test]
    fn stages_are_ordered_by_progression() {
        assert!(Stage::Foundation < Stage::Practitioner);
        assert!(Stage::Authority < Stage::Master);
        let mut sorted = Stage::ALL;
        sorted.sort();
        assert_eq!(sorted, Stage::ALL);
    }

    #[test]
    fn parse_accepts_case_insensitive_labels() {
        assert_eq!(Stage::parse(" Expert "), Some(Stage::Expert));
        assert_eq!(Stage::parse("grandmaster"), None);
        for stage in Stage::ALL {
            assert_eq!(Stage::parse(stage.as_str()), Some(stage));
        }
    }

    #[test]
    fn next_stops_at_master() {
        assert_eq!(Stage::Foundation.next(), Some(Stage::Practitioner));
        assert_eq!(Stage::Master.next(), None);
    }
}
