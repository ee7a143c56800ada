use std::collections::HashSet;

use crate::error::MatcherError;
use crate::matcher::{Comparison, Matcher};
use crate::template::{Minutia, Template};

/// Header: minutia count + texture count, both u16 little-endian.
const HEADER_LEN: usize = 4;
/// Serialized size of one minutia record (x, y as u16 LE).
const MINUTIA_LEN: usize = 4;
/// Serialized size of one texture feature (f32 LE).
const TEXTURE_LEN: usize = 4;

/// Length of the sub-score vector produced by [`GridMatcher`].
pub const GRID_SCORE_LEN: usize = 32;

/// Built-in reference matcher over a grid-quantized template layout.
///
/// This is a deterministic stand-in for a real fingerprint matcher.
/// It exists so the store, the search, the CLI, and the tests have a
/// concrete codec to run against without linking a vendor library;
/// its scores rank exact self-matches first but say nothing about
/// real ridge similarity.
///
/// Template wire format (all little-endian):
///
/// ```text
/// [2B minutia count n] [2B texture count m]
/// n x [2B x] [2B y]
/// m x [4B f32 texture feature]
/// ```
///
/// Sub-score vector (length 32):
/// - `s[0]`: number of exactly shared minutia points
/// - `s[1]`: minutia count agreement, `min(n_p, n_e) / max(n_p, n_e)`
/// - `s[2]`: cosine similarity of the overlapping texture prefix
/// - `s[28]`: texture count agreement, `min(m_p, m_e) / max(m_p, m_e)`
/// - all other indices: 0
#[derive(Debug, Default, Clone, Copy)]
pub struct GridMatcher;

impl GridMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Serializes a template into the wire format [`parse_template`]
    /// accepts. Used to build archives in tests and tooling.
    ///
    /// [`parse_template`]: Matcher::parse_template
    pub fn encode(tpl: &Template) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            HEADER_LEN
                + tpl.minutia_count() * MINUTIA_LEN
                + tpl.texture_count() * TEXTURE_LEN,
        );
        out.extend_from_slice(&(tpl.minutia_count() as u16).to_le_bytes());
        out.extend_from_slice(&(tpl.texture_count() as u16).to_le_bytes());
        for m in tpl.minutiae() {
            out.extend_from_slice(&m.x.to_le_bytes());
            out.extend_from_slice(&m.y.to_le_bytes());
        }
        for &t in tpl.textures() {
            out.extend_from_slice(&t.to_le_bytes());
        }
        out
    }
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

/// Ratio of the smaller count to the larger. 0 when either is 0.
fn count_agreement(a: usize, b: usize) -> f32 {
    let (lo, hi) = (a.min(b), a.max(b));
    if hi == 0 {
        return 0.0;
    }
    lo as f32 / hi as f32
}

fn texture_cosine(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut na = 0.0f32;
    let mut nb = 0.0f32;
    for i in 0..n {
        dot += a[i] * b[i];
        na += a[i] * a[i];
        nb += b[i] * b[i];
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na.sqrt() * nb.sqrt())
}

impl Matcher for GridMatcher {
    fn parse_template(&self, bytes: &[u8]) -> Result<Template, MatcherError> {
        if bytes.len() < HEADER_LEN {
            return Err(MatcherError::Truncated {
                need: HEADER_LEN,
                got: bytes.len(),
            });
        }
        let n = read_u16(bytes, 0) as usize;
        let m = read_u16(bytes, 2) as usize;

        let need = HEADER_LEN + n * MINUTIA_LEN + m * TEXTURE_LEN;
        if bytes.len() < need {
            return Err(MatcherError::Truncated {
                need,
                got: bytes.len(),
            });
        }
        if bytes.len() > need {
            return Err(MatcherError::Malformed(format!(
                "{} trailing bytes after {n} minutiae and {m} textures",
                bytes.len() - need
            )));
        }

        let mut at = HEADER_LEN;
        let mut minutiae = Vec::with_capacity(n);
        for _ in 0..n {
            minutiae.push(Minutia {
                x: read_u16(bytes, at),
                y: read_u16(bytes, at + 2),
            });
            at += MINUTIA_LEN;
        }

        let mut textures = Vec::with_capacity(m);
        for _ in 0..m {
            let raw = [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]];
            textures.push(f32::from_le_bytes(raw));
            at += TEXTURE_LEN;
        }

        Ok(Template::new(minutiae, textures))
    }

    fn compare(
        &self,
        probe: &Template,
        exemplar: &Template,
    ) -> Result<Comparison, MatcherError> {
        if probe.is_empty() {
            return Ok(Comparison::EmptyProbe);
        }
        if exemplar.is_empty() {
            return Ok(Comparison::EmptyExemplar);
        }

        let probe_set: HashSet<&Minutia> = probe.minutiae().iter().collect();
        let shared = exemplar
            .minutiae()
            .iter()
            .filter(|m| probe_set.contains(m))
            .count();

        let mut scores = vec![0.0f32; GRID_SCORE_LEN];
        scores[0] = shared as f32;
        scores[1] = count_agreement(probe.minutia_count(), exemplar.minutia_count());
        scores[2] = texture_cosine(probe.textures(), exemplar.textures());
        scores[28] = count_agreement(probe.texture_count(), exemplar.texture_count());

        Ok(Comparison::Scores(scores))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tpl(points: &[(u16, u16)], textures: &[f32]) -> Template {
        Template::new(
            points.iter().map(|&(x, y)| Minutia { x, y }).collect(),
            textures.to_vec(),
        )
    }

    #[test]
    fn encode_parse_round_trip() {
        let t = tpl(&[(1, 2), (30, 40)], &[0.5, -1.0, 2.5]);
        let bytes = GridMatcher::encode(&t);
        let parsed = GridMatcher::new().parse_template(&bytes).unwrap();
        assert_eq!(parsed, t);
    }

    #[test]
    fn parse_zero_feature_template_is_empty_not_error() {
        let bytes = GridMatcher::encode(&Template::empty());
        let parsed = GridMatcher::new().parse_template(&bytes).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn parse_truncated() {
        let t = tpl(&[(1, 2)], &[]);
        let mut bytes = GridMatcher::encode(&t);
        bytes.pop();
        let err = GridMatcher::new().parse_template(&bytes).unwrap_err();
        assert!(matches!(err, MatcherError::Truncated { .. }));
    }

    #[test]
    fn parse_trailing_garbage() {
        let mut bytes = GridMatcher::encode(&tpl(&[(1, 2)], &[]));
        bytes.push(0xFF);
        let err = GridMatcher::new().parse_template(&bytes).unwrap_err();
        assert!(matches!(err, MatcherError::Malformed(_)));
    }

    #[test]
    fn compare_empty_sentinels() {
        let m = GridMatcher::new();
        let full = tpl(&[(1, 1)], &[1.0]);
        assert_eq!(
            m.compare(&Template::empty(), &full).unwrap(),
            Comparison::EmptyProbe
        );
        assert_eq!(
            m.compare(&full, &Template::empty()).unwrap(),
            Comparison::EmptyExemplar
        );
    }

    #[test]
    fn compare_scores_identical_templates() {
        let m = GridMatcher::new();
        let t = tpl(&[(1, 1), (2, 2)], &[1.0, 0.5]);
        let Comparison::Scores(s) = m.compare(&t, &t).unwrap() else {
            panic!("expected scores");
        };
        assert_eq!(s.len(), GRID_SCORE_LEN);
        assert_eq!(s[0], 2.0);
        assert_eq!(s[1], 1.0);
        assert!((s[2] - 1.0).abs() < 1e-6);
        assert_eq!(s[28], 1.0);
        // Untouched indices stay zero.
        assert_eq!(s[3], 0.0);
        assert_eq!(s[31], 0.0);
    }

    #[test]
    fn compare_disjoint_minutiae() {
        let m = GridMatcher::new();
        let a = tpl(&[(1, 1)], &[]);
        let b = tpl(&[(9, 9)], &[]);
        let Comparison::Scores(s) = m.compare(&a, &b).unwrap() else {
            panic!("expected scores");
        };
        assert_eq!(s[0], 0.0);
        assert_eq!(s[1], 1.0);
    }
}
