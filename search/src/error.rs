use thiserror::Error;

/// Errors returned by an identification search.
///
/// Only whole-search failures appear here. A record that cannot be
/// read or scored is skipped and logged, never surfaced.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("probe template is empty")]
    EmptyProbe,

    #[error("probe template not parseable: {0}")]
    Probe(String),

    #[error("probe template has no minutiae or texture features")]
    NoFeatures,

    #[error("no scores generated")]
    NoScores,

    #[error("search cancelled")]
    Cancelled,

    #[error("config: {0}")]
    Config(String),
}
