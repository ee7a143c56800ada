use thiserror::Error;

/// Errors returned by template parsing and comparison.
#[derive(Debug, Error)]
pub enum MatcherError {
    #[error("malformed template: {0}")]
    Malformed(String),

    #[error("template truncated: need {need} bytes, got {got}")]
    Truncated { need: usize, got: usize },
}
