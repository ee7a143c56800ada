use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::EnrollDbError;

/// Byte location of one enrolled record inside the archive file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Byte offset into the archive.
    pub offset: u64,
    /// Length of the serialized template at `offset`.
    pub length: u64,
    /// Set during cache warm-up once the decoded template sits in the
    /// memory cache. Never flips back.
    pub cached: bool,
}

/// Parses a manifest file into the disk index.
///
/// The format is plain text, one record per line, three
/// whitespace-separated tokens: `identifier length offset` (length
/// before offset, matching the archive writer). Blank lines are
/// skipped. A duplicated identifier keeps its last occurrence.
///
/// Parsing stops exactly at the end of well-formed input; a malformed
/// line is an error, never a stale or default entry.
pub fn parse_manifest(
    path: &Path,
) -> Result<HashMap<String, ManifestEntry>, EnrollDbError> {
    let text = fs::read_to_string(path).map_err(|e| EnrollDbError::io(path, e))?;

    let mut index = HashMap::new();
    for (i, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let Some(identifier) = tokens.next() else {
            continue; // blank line
        };
        let length = parse_field(tokens.next(), i + 1, "length")?;
        let offset = parse_field(tokens.next(), i + 1, "offset")?;
        if let Some(extra) = tokens.next() {
            return Err(EnrollDbError::Manifest {
                line: i + 1,
                detail: format!("unexpected trailing token {extra:?}"),
            });
        }
        index.insert(
            identifier.to_string(),
            ManifestEntry {
                offset,
                length,
                cached: false,
            },
        );
    }
    Ok(index)
}

fn parse_field(
    token: Option<&str>,
    line: usize,
    name: &str,
) -> Result<u64, EnrollDbError> {
    let token = token.ok_or_else(|| EnrollDbError::Manifest {
        line,
        detail: format!("missing {name}"),
    })?;
    token.parse().map_err(|_| EnrollDbError::Manifest {
        line,
        detail: format!("invalid {name} {token:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use tempfile::NamedTempFile;

    fn write_manifest(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parse_basic() {
        let f = write_manifest("a 10 0\nb 20 10\nc 15 30\n");
        let idx = parse_manifest(f.path()).unwrap();
        assert_eq!(idx.len(), 3);
        assert_eq!(idx["b"].length, 20);
        assert_eq!(idx["b"].offset, 10);
        assert!(!idx["b"].cached);
    }

    #[test]
    fn parse_stops_at_end_of_input() {
        // Trailing newline and blank lines must not produce entries.
        let f = write_manifest("a 1 0\n\n\nb 2 1\n\n");
        let idx = parse_manifest(f.path()).unwrap();
        assert_eq!(idx.len(), 2);
    }

    #[test]
    fn duplicate_identifier_last_wins() {
        let f = write_manifest("a 1 0\na 2 1\n");
        let idx = parse_manifest(f.path()).unwrap();
        assert_eq!(idx.len(), 1);
        assert_eq!(idx["a"].length, 2);
        assert_eq!(idx["a"].offset, 1);
    }

    #[test]
    fn malformed_length() {
        let f = write_manifest("a ten 0\n");
        let err = parse_manifest(f.path()).unwrap_err();
        assert!(matches!(err, EnrollDbError::Manifest { line: 1, .. }));
    }

    #[test]
    fn missing_offset() {
        let f = write_manifest("a 1 0\nb 2\n");
        let err = parse_manifest(f.path()).unwrap_err();
        assert!(matches!(err, EnrollDbError::Manifest { line: 2, .. }));
    }

    #[test]
    fn trailing_token() {
        let f = write_manifest("a 1 0 junk\n");
        assert!(parse_manifest(f.path()).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = parse_manifest(Path::new("/nonexistent/manifest")).unwrap_err();
        assert!(matches!(err, EnrollDbError::Io { .. }));
    }

    #[test]
    fn empty_file() {
        let f = write_manifest("");
        assert!(parse_manifest(f.path()).unwrap().is_empty());
    }
}
