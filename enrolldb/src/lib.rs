//! Hybrid memory/disk enrollment store over a manifest-indexed
//! template archive.
//!
//! An enrollment database directory holds two files:
//!
//! - `manifest`: text triples `identifier length offset`, one per
//!   enrolled record
//! - `archive`: a flat binary blob; each record's serialized template
//!   occupies `[offset, offset + length)`
//!
//! [`EnrollDb::load`] parses the manifest into an immutable disk
//! index, then warms an in-memory cache of decoded templates under a
//! byte budget. Point lookups ([`EnrollDb::read`]) are served from
//! the cache when possible and from a seek into the archive
//! otherwise. After `load` the store is read-only and can be shared
//! across threads.
//!
//! [`provision_reference_db`] copies a caller-supplied archive +
//! manifest pair into a fresh database directory.

mod error;
mod manifest;
mod provision;
mod store;

pub use error::EnrollDbError;
pub use manifest::{parse_manifest, ManifestEntry};
pub use provision::provision_reference_db;
pub use store::EnrollDb;
