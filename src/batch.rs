//! Install batches
//!
//! A batch is the ordered set of artifacts one module hands to the
//! repository store. Deduplication is by coordinate with first occurrence
//! winning, so the same artifact can never be registered twice no matter
//! how the set was assembled.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::coordinate::ArtifactCoordinate;

/// One artifact queued for installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRecord {
    pub coordinate: ArtifactCoordinate,
    pub source_path: PathBuf,
}

impl ArtifactRecord {
    pub fn new(coordinate: ArtifactCoordinate, source_path: impl Into<PathBuf>) -> Self {
        Self {
            coordinate,
            source_path: source_path.into(),
        }
    }
}

/// Ordered, coordinate-deduplicated set of [`ArtifactRecord`]s.
///
/// Consumed by value by the store exactly once; there is no way to mutate a
/// batch after submission.
#[derive(Debug, Default)]
pub struct InstallBatch {
    records: Vec<ArtifactRecord>,
    seen: HashSet<ArtifactCoordinate>,
}

impl InstallBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record unless its coordinate is already present.
    ///
    /// Returns `true` if the record was added. Duplicates are skipped
    /// silently; the first occurrence wins.
    pub fn add(&mut self, record: ArtifactRecord) -> bool {
        if self.seen.contains(&record.coordinate) {
            return false;
        }
        self.seen.insert(record.coordinate.clone());
        self.records.push(record);
        true
    }

    pub fn records(&self) -> &[ArtifactRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, coordinate: &ArtifactCoordinate) -> bool {
        self.seen.contains(coordinate)
    }
}
