//! Template codec and pairwise comparison seam for fingerprint
//! identification.
//!
//! The identification pipeline treats the matching algorithm as an
//! injected capability with exactly two operations:
//!
//! 1. [`Matcher::parse_template`]: serialized bytes -> [`Template`]
//! 2. [`Matcher::compare`]: (probe, exemplar) -> [`Comparison`]
//!
//! A [`Comparison`] is either a fixed-length sub-score vector or one
//! of two empty-side sentinels; downstream code folds the sub-scores
//! into a composite score with weights of its own, so nothing outside
//! an implementation depends on the algorithm's internals.
//!
//! [`GridMatcher`] is a deterministic built-in implementation used by
//! tests, benches, and tooling.

mod error;
mod grid;
mod matcher;
mod template;

pub use error::MatcherError;
pub use grid::{GridMatcher, GRID_SCORE_LEN};
pub use matcher::{Comparison, Matcher};
pub use template::{Minutia, Template};
