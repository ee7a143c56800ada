use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors returned by enrollment database operations.
#[derive(Debug, Error)]
pub enum EnrollDbError {
    #[error("manifest line {line}: {detail}")]
    Manifest { line: usize, detail: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("record {identifier}: {detail}")]
    Record { identifier: String, detail: String },
}

impl EnrollDbError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
