use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use latentid_enrolldb::EnrollDb;
use latentid_matcher::{Comparison, Matcher, Template};
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::topk::TopK;
use crate::types::{Candidate, FingerPosition, SearchOutcome};

/// Scan progress is logged at debug level once per this many
/// exemplars.
const PROGRESS_INTERVAL: u64 = 1000;

/// Running state of one scan (or one shard of a parallel scan).
struct Tally {
    topk: TopK,
    /// Max-reduction over every recorded score. Kept separately from
    /// the top-K set so the decision is well-defined even for K = 0.
    best: f32,
    recorded: u64,
}

impl Tally {
    fn new(capacity: usize) -> Self {
        Self {
            topk: TopK::new(capacity),
            best: f32::NEG_INFINITY,
            recorded: 0,
        }
    }

    fn record(&mut self, identifier: &str, score: f32) {
        if score.is_nan() {
            warn!(identifier, "NaN composite score skipped");
            return;
        }
        self.recorded += 1;
        if score > self.best {
            self.best = score;
        }
        self.topk.push(identifier, score);
    }

    fn absorb(&mut self, other: Tally) {
        self.recorded += other.recorded;
        if other.best > self.best {
            self.best = other.best;
        }
        self.topk.merge(other.topk);
    }
}

/// Ranks a probe template against every enrolled exemplar.
///
/// Borrows a loaded [`EnrollDb`] and an injected [`Matcher`]; the
/// scan is a linear pass over the store's identifiers that keeps only
/// the best `max_candidates` composite scores.
pub struct Searcher<'a> {
    db: &'a EnrollDb,
    matcher: &'a dyn Matcher,
    cfg: SearchConfig,
}

impl<'a> Searcher<'a> {
    /// Panics if `cfg.fusion` pairs a different number of indices and
    /// weights. [`SearchConfig::from_file`] rejects such a config with
    /// an error; a hand-built one is a programming mistake.
    pub fn new(db: &'a EnrollDb, matcher: &'a dyn Matcher, cfg: SearchConfig) -> Self {
        assert_eq!(
            cfg.fusion.indices.len(),
            cfg.fusion.weights.len(),
            "latentid-search: fusion indices/weights length mismatch"
        );
        Self { db, matcher, cfg }
    }

    /// Full sequential scan. See [`Searcher::search_cancellable`].
    pub fn search(
        &self,
        probe_bytes: &[u8],
        max_candidates: u16,
    ) -> Result<SearchOutcome, SearchError> {
        self.search_cancellable(probe_bytes, max_candidates, &AtomicBool::new(false))
    }

    /// Full sequential scan with cooperative cancellation. The flag
    /// is checked once per scanned identifier; a long scan over a
    /// large store is the expected cost, not a hang, but a caller
    /// exposing this as a service can still abort it.
    ///
    /// Fast-fail paths (empty buffer, unparseable probe, featureless
    /// probe) return before any store access. A store that produces
    /// zero usable scores is [`SearchError::NoScores`], distinct from
    /// a valid worst-case score of 0.
    pub fn search_cancellable(
        &self,
        probe_bytes: &[u8],
        max_candidates: u16,
        cancel: &AtomicBool,
    ) -> Result<SearchOutcome, SearchError> {
        let probe = self.parse_probe(probe_bytes)?;

        let mut tally = Tally::new(max_candidates as usize);
        let mut scanned = 0u64;
        for identifier in self.db.identifiers() {
            if cancel.load(Ordering::Relaxed) {
                return Err(SearchError::Cancelled);
            }
            scanned += 1;
            if scanned % PROGRESS_INTERVAL == 0 {
                debug!(scanned, identifier, "scan progress");
            }
            if let Some(score) = self.score_one(&probe, identifier) {
                tally.record(identifier, score);
            }
        }

        self.finish(tally)
    }

    /// Sharded scan: the identifier set is split across `workers`
    /// threads, each folding into its own bounded top-K, merged at
    /// the end. Same semantics as [`Searcher::search`]; the store and
    /// matcher are read-only during the scan, so shards never contend.
    pub fn par_search(
        &self,
        probe_bytes: &[u8],
        max_candidates: u16,
        workers: usize,
    ) -> Result<SearchOutcome, SearchError> {
        let probe = self.parse_probe(probe_bytes)?;

        let identifiers: Vec<&str> = self.db.identifiers().collect();
        let workers = workers.max(1).min(identifiers.len().max(1));
        let chunk = identifiers.len().div_ceil(workers).max(1);

        let mut tally = Tally::new(max_candidates as usize);
        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            for shard in identifiers.chunks(chunk) {
                let probe = &probe;
                handles.push(scope.spawn(move || {
                    let mut local = Tally::new(max_candidates as usize);
                    for identifier in shard {
                        if let Some(score) = self.score_one(probe, identifier) {
                            local.record(identifier, score);
                        }
                    }
                    local
                }));
            }
            for handle in handles {
                // Scoring closures do not panic; a poisoned join would
                // be a bug in this crate.
                if let Ok(local) = handle.join() {
                    tally.absorb(local);
                }
            }
        });

        self.finish(tally)
    }

    fn parse_probe(&self, bytes: &[u8]) -> Result<Template, SearchError> {
        if bytes.is_empty() {
            return Err(SearchError::EmptyProbe);
        }
        let probe = self
            .matcher
            .parse_template(bytes)
            .map_err(|e| SearchError::Probe(e.to_string()))?;
        if probe.is_empty() {
            return Err(SearchError::NoFeatures);
        }
        Ok(probe)
    }

    /// Fetches and scores one exemplar. `None` means the record was
    /// skipped: unreadable, empty on either side, or not coverable by
    /// the configured fusion. Skips never abort the scan.
    fn score_one(&self, probe: &Template, identifier: &str) -> Option<f32> {
        let exemplar = match self.db.read(identifier, self.matcher, false) {
            Ok(t) => t,
            Err(e) => {
                warn!(identifier, error = %e, "unreadable record skipped");
                return None;
            }
        };

        let scores = match self.matcher.compare(probe, &exemplar) {
            Ok(Comparison::Scores(s)) => s,
            Ok(Comparison::EmptyProbe) | Ok(Comparison::EmptyExemplar) => return None,
            Err(e) => {
                warn!(identifier, error = %e, "comparison failed, record skipped");
                return None;
            }
        };

        match self.cfg.fusion.fuse(&scores) {
            Some(score) => Some(score),
            None => {
                warn!(
                    identifier,
                    len = scores.len(),
                    "sub-score vector too short for fusion, record skipped"
                );
                None
            }
        }
    }

    fn finish(&self, tally: Tally) -> Result<SearchOutcome, SearchError> {
        if tally.recorded == 0 {
            return Err(SearchError::NoScores);
        }
        let candidates = tally
            .topk
            .into_descending()
            .into_iter()
            .map(|(identifier, score)| Candidate {
                identifier,
                position: FingerPosition::Unknown,
                score,
            })
            .collect();
        Ok(SearchOutcome {
            decision: tally.best >= self.cfg.decision_threshold,
            candidates,
        })
    }
}
