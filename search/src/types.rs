use std::fmt;

use serde::{Deserialize, Serialize};

/// Anatomical source of a candidate's enrolled impression.
///
/// The core search does not determine this; every candidate it emits
/// carries [`FingerPosition::Unknown`] until a surrounding component
/// resolves it from enrollment metadata.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FingerPosition {
    #[default]
    Unknown,
    RightThumb,
    RightIndex,
    RightMiddle,
    RightRing,
    RightLittle,
    LeftThumb,
    LeftIndex,
    LeftMiddle,
    LeftRing,
    LeftLittle,
}

impl fmt::Display for FingerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unknown => "unknown",
            Self::RightThumb => "right-thumb",
            Self::RightIndex => "right-index",
            Self::RightMiddle => "right-middle",
            Self::RightRing => "right-ring",
            Self::RightLittle => "right-little",
            Self::LeftThumb => "left-thumb",
            Self::LeftIndex => "left-index",
            Self::LeftMiddle => "left-middle",
            Self::LeftRing => "left-ring",
            Self::LeftLittle => "left-little",
        };
        write!(f, "{s}")
    }
}

/// One entry of a search's ranked candidate list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub identifier: String,
    pub position: FingerPosition,
    pub score: f32,
}

/// Result of a completed identification search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// True when the best composite score reached the configured
    /// decision threshold.
    pub decision: bool,

    /// Up to K candidates, sorted by score descending.
    pub candidates: Vec<Candidate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finger_position_display() {
        assert_eq!(FingerPosition::Unknown.to_string(), "unknown");
        assert_eq!(FingerPosition::LeftRing.to_string(), "left-ring");
    }

    #[test]
    fn candidate_serializes_position_as_snake_case() {
        let c = Candidate {
            identifier: "subject-17".to_string(),
            position: FingerPosition::Unknown,
            score: 3.5,
        };
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains(r#""position":"unknown""#));
    }
}
