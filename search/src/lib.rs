//! Bounded top-K identification search over an enrollment store.
//!
//! A [`Searcher`] linearly scans every identifier in a loaded
//! [`EnrollDb`](latentid_enrolldb::EnrollDb), scores each exemplar
//! against the probe through an injected
//! [`Matcher`](latentid_matcher::Matcher), folds the sub-score vector
//! with a configured [`ScoreFusion`], and retains only the K highest
//! composite scores in a [`TopK`] min-heap. The full score list is
//! never materialized.
//!
//! Scan semantics:
//! - per-record failures (unreadable, undecodable, empty exemplar)
//!   are skipped, never fatal
//! - probe problems fail fast, before any store access
//! - a scan that records zero scores fails with
//!   [`SearchError::NoScores`]
//! - the candidate list comes back sorted by score descending, and
//!   the decision flag compares the best score against the configured
//!   threshold

mod config;
mod error;
mod search;
mod topk;
mod types;

pub use config::{ScoreFusion, SearchConfig};
pub use error::SearchError;
pub use search::Searcher;
pub use topk::TopK;
pub use types::{Candidate, FingerPosition, SearchOutcome};
