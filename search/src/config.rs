use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Linear fold of a matcher's sub-score vector into one composite
/// score: `sum(weights[i] * scores[indices[i]])`.
///
/// The default picks sub-scores 0, 1, 2 at full weight and sub-score
/// 28 at 0.3, the combination the reference deployment was tuned
/// with. The indices are matcher-specific and must match whatever
/// algorithm is injected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFusion {
    pub indices: Vec<usize>,
    pub weights: Vec<f32>,
}

impl Default for ScoreFusion {
    fn default() -> Self {
        Self {
            indices: vec![0, 1, 2, 28],
            weights: vec![1.0, 1.0, 1.0, 0.3],
        }
    }
}

impl ScoreFusion {
    /// Folds a sub-score vector. `None` when the vector is too short
    /// for the configured indices.
    pub fn fuse(&self, scores: &[f32]) -> Option<f32> {
        let mut total = 0.0;
        for (&index, &weight) in self.indices.iter().zip(&self.weights) {
            total += scores.get(index)? * weight;
        }
        Some(total)
    }

    fn validate(&self) -> Result<(), SearchError> {
        if self.indices.len() != self.weights.len() {
            return Err(SearchError::Config(format!(
                "{} indices but {} weights",
                self.indices.len(),
                self.weights.len()
            )));
        }
        Ok(())
    }
}

/// Tunables of an identification search.
///
/// Compiled-in defaults match the reference deployment; a calibrated
/// deployment overrides them from a JSON file via
/// [`SearchConfig::from_file`] rather than patching constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub fusion: ScoreFusion,

    /// A search's decision flag is true when the best composite score
    /// reaches this value. The default of 0.0 is a placeholder, not a
    /// calibrated operating point.
    pub decision_threshold: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fusion: ScoreFusion::default(),
            decision_threshold: 0.0,
        }
    }
}

impl SearchConfig {
    pub fn from_file(path: &Path) -> Result<Self, SearchError> {
        let text = fs::read_to_string(path)
            .map_err(|e| SearchError::Config(format!("{}: {e}", path.display())))?;
        let cfg: Self = serde_json::from_str(&text)
            .map_err(|e| SearchError::Config(format!("{}: {e}", path.display())))?;
        cfg.fusion.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use tempfile::NamedTempFile;

    #[test]
    fn default_fusion_matches_reference_weights() {
        let mut scores = vec![0.0f32; 32];
        scores[0] = 1.0;
        scores[1] = 2.0;
        scores[2] = 3.0;
        scores[28] = 10.0;
        let fused = ScoreFusion::default().fuse(&scores).unwrap();
        assert!((fused - 9.0).abs() < 1e-6);
    }

    #[test]
    fn fuse_short_vector_is_none() {
        let scores = vec![1.0f32; 10]; // index 28 absent
        assert_eq!(ScoreFusion::default().fuse(&scores), None);
    }

    #[test]
    fn config_round_trip() {
        let cfg = SearchConfig {
            fusion: ScoreFusion {
                indices: vec![0, 3],
                weights: vec![2.0, 0.5],
            },
            decision_threshold: 41.5,
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn from_file_with_partial_overrides() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(br#"{"decision_threshold": 7.25}"#).unwrap();
        let cfg = SearchConfig::from_file(f.path()).unwrap();
        assert_eq!(cfg.decision_threshold, 7.25);
        assert_eq!(cfg.fusion, ScoreFusion::default());
    }

    #[test]
    fn from_file_rejects_mismatched_fusion() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(br#"{"fusion": {"indices": [0, 1], "weights": [1.0]}}"#)
            .unwrap();
        assert!(matches!(
            SearchConfig::from_file(f.path()),
            Err(SearchError::Config(_))
        ));
    }

    #[test]
    fn from_file_missing() {
        assert!(SearchConfig::from_file(Path::new("/nonexistent.json")).is_err());
    }
}
