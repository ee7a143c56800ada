use crate::error::MatcherError;
use crate::template::Template;

/// Outcome of comparing a probe against an exemplar.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    /// The probe template carries no features; nothing to compare.
    EmptyProbe,
    /// The exemplar template carries no features. Expected for
    /// padding or corrupt enrollment records, not an anomaly.
    EmptyExemplar,
    /// Fixed-length sub-score vector. The length and the meaning of
    /// each index are specific to the matcher implementation.
    Scores(Vec<f32>),
}

/// The externally supplied matching algorithm.
///
/// Implementations decode serialized templates and score probe /
/// exemplar pairs. The store and the search treat both operations as
/// opaque capabilities: they never look inside a [`Template`] beyond
/// its feature counts, and they fold the sub-score vector with
/// weights they are configured with, not weights the matcher knows
/// about.
///
/// Implementations must be safe to share across scan worker threads.
pub trait Matcher: Send + Sync {
    /// Decodes a serialized template.
    ///
    /// A well-formed buffer describing zero features parses into the
    /// empty sentinel; that is a successful parse, not an error.
    fn parse_template(&self, bytes: &[u8]) -> Result<Template, MatcherError>;

    /// Compares a probe against an exemplar.
    fn compare(
        &self,
        probe: &Template,
        exemplar: &Template,
    ) -> Result<Comparison, MatcherError>;
}
