use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::mem;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use latentid_matcher::{Matcher, Template};
use tracing::warn;

use crate::error::EnrollDbError;
use crate::manifest::{parse_manifest, ManifestEntry};

/// Assumed ratio of decoded in-memory size to serialized on-disk
/// size, used by the cache warm-up budget.
const DECODED_SIZE_RATIO: f64 = 1.2;

/// Hybrid memory/disk store over a manifest-indexed template archive.
///
/// [`EnrollDb::load`] builds the disk index from `<dir>/manifest` and
/// warms an in-memory cache of decoded templates up to a byte budget.
/// [`EnrollDb::read`] serves a cached clone when possible and falls
/// back to seeking into `<dir>/archive` otherwise.
///
/// After `load` returns, the store is read-only: lookups never mutate
/// the index or the cache, so a `&EnrollDb` can be shared freely
/// across scan worker threads.
pub struct EnrollDb {
    dir: PathBuf,
    disk: HashMap<String, ManifestEntry>,
    mem: HashMap<String, Template>,
    disk_reads: AtomicU64,
}

impl EnrollDb {
    /// Remembers the database directory. Nothing is read until
    /// [`EnrollDb::load`].
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            disk: HashMap::new(),
            mem: HashMap::new(),
            disk_reads: AtomicU64::new(0),
        }
    }

    /// Builds the disk index and warms the memory cache.
    ///
    /// The warm-up budget starts at `max_bytes` minus an estimate of
    /// the index's own bookkeeping, then each entry is charged
    /// `ceil(1.2 x on-disk length)` plus a per-key overhead. Charging
    /// stops at the first entry that exhausts the budget, so the
    /// cache is a prefix of the index's iteration order, not a
    /// best-fit packing. All of this is a size heuristic, not a
    /// measured allocation.
    ///
    /// Fails only if the manifest cannot be read or parsed. A record
    /// that cannot be decoded during warm-up is skipped and served
    /// from disk later; caching zero entries (tiny budget) or all
    /// entries (ample budget) are both ordinary outcomes.
    pub fn load(
        &mut self,
        max_bytes: u64,
        matcher: &dyn Matcher,
    ) -> Result<(), EnrollDbError> {
        self.disk = parse_manifest(&self.dir.join("manifest"))?;
        self.mem.clear();

        let n = self.disk.len();
        let bookkeeping = mem::size_of::<HashMap<String, ManifestEntry>>()
            + n * (mem::size_of::<String>() + mem::size_of::<ManifestEntry>());
        let mut remaining = i64::try_from(max_bytes).unwrap_or(i64::MAX);
        remaining = remaining.saturating_sub(bookkeeping as i64);

        let identifiers: Vec<String> = self.disk.keys().cloned().collect();
        for identifier in identifiers {
            let entry = self.disk[&identifier];
            let cost = (DECODED_SIZE_RATIO * entry.length as f64).ceil() as i64
                + mem::size_of::<String>() as i64;
            remaining = remaining.saturating_sub(cost);
            if remaining <= 0 {
                break;
            }

            match self.fetch(&identifier, entry, matcher) {
                Ok(tpl) => {
                    self.mem.insert(identifier.clone(), tpl);
                    if let Some(e) = self.disk.get_mut(&identifier) {
                        e.cached = true;
                    }
                }
                Err(e) => {
                    warn!(identifier = %identifier, error = %e,
                        "cache warm-up skipped record");
                }
            }
        }
        Ok(())
    }

    /// Looks up one enrolled template.
    ///
    /// An identifier absent from the index yields the empty sentinel,
    /// not an error; so does a record that fails to decode. Callers
    /// check [`Template::is_empty`]. I/O failures (archive missing,
    /// seek past end, short read) do propagate.
    ///
    /// `force_from_disk` bypasses the memory cache.
    pub fn read(
        &self,
        identifier: &str,
        matcher: &dyn Matcher,
        force_from_disk: bool,
    ) -> Result<Template, EnrollDbError> {
        let Some(entry) = self.disk.get(identifier) else {
            return Ok(Template::empty());
        };

        if !force_from_disk && entry.cached {
            if let Some(tpl) = self.mem.get(identifier) {
                return Ok(tpl.clone());
            }
        }

        match self.fetch(identifier, *entry, matcher) {
            Ok(tpl) => Ok(tpl),
            Err(EnrollDbError::Record { .. }) => Ok(Template::empty()),
            Err(e) => Err(e),
        }
    }

    /// Record count: the memory cache when `in_mem`, the full disk
    /// index otherwise. Meaningful only after [`EnrollDb::load`];
    /// before it, both counts are 0.
    pub fn len(&self, in_mem: bool) -> usize {
        if in_mem {
            self.mem.len()
        } else {
            self.disk.len()
        }
    }

    /// All enrolled identifiers, in index (hash) order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.disk.keys().map(String::as_str)
    }

    /// Number of archive accesses performed so far. Instrumentation
    /// for tests asserting cache hits and fast-fail paths.
    pub fn disk_reads(&self) -> u64 {
        self.disk_reads.load(Ordering::Relaxed)
    }

    /// Seeks into the archive and decodes one record. Unlike
    /// [`EnrollDb::read`], a decode failure propagates here so the
    /// warm-up can skip the record without caching a sentinel.
    fn fetch(
        &self,
        identifier: &str,
        entry: ManifestEntry,
        matcher: &dyn Matcher,
    ) -> Result<Template, EnrollDbError> {
        self.disk_reads.fetch_add(1, Ordering::Relaxed);

        let path = self.dir.join("archive");
        let mut archive = File::open(&path).map_err(|e| EnrollDbError::io(&path, e))?;

        // Guard the claimed extent against the actual file size before
        // allocating; a corrupt manifest must not drive the allocator.
        let archive_len = archive
            .metadata()
            .map_err(|e| EnrollDbError::io(&path, e))?
            .len();
        let within = entry
            .offset
            .checked_add(entry.length)
            .is_some_and(|end| end <= archive_len);
        if !within {
            return Err(EnrollDbError::io(
                &path,
                std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!(
                        "record [{}, {}+{}) exceeds archive size {archive_len}",
                        entry.offset, entry.offset, entry.length
                    ),
                ),
            ));
        }

        archive
            .seek(SeekFrom::Start(entry.offset))
            .map_err(|e| EnrollDbError::io(&path, e))?;

        let length = usize::try_from(entry.length).map_err(|_| {
            EnrollDbError::Record {
                identifier: identifier.to_string(),
                detail: format!("length {} does not fit in memory", entry.length),
            }
        })?;
        let mut buf = vec![0u8; length];
        archive
            .read_exact(&mut buf)
            .map_err(|e| EnrollDbError::io(&path, e))?;

        matcher
            .parse_template(&buf)
            .map_err(|e| EnrollDbError::Record {
                identifier: identifier.to_string(),
                detail: e.to_string(),
            })
    }
}
