use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::EnrollDbError;

/// Provisions a reference database directory from a caller-supplied
/// archive and manifest.
///
/// Both files are plain copies: the archive lands at
/// `<dest>/archive`, the manifest at `<dest>/manifest`, the names
/// [`EnrollDb::load`](crate::EnrollDb::load) expects. A failed copy
/// reports the offending source path with the underlying I/O error.
pub fn provision_reference_db(
    archive: &Path,
    manifest: &Path,
    dest: &Path,
) -> Result<(), EnrollDbError> {
    fs::copy(archive, dest.join("archive"))
        .map_err(|e| EnrollDbError::io(archive, e))?;
    fs::copy(manifest, dest.join("manifest"))
        .map_err(|e| EnrollDbError::io(manifest, e))?;
    info!(dest = %dest.display(), "reference database provisioned");
    Ok(())
}
