//! Repository store collaborator
//!
//! The core only needs two operations from the store: a pure path function
//! for a coordinate, and a batch install that behaves atomically per call.
//! [`LocalRepository`] is the on-disk Maven-layout implementation that makes
//! the CLI a working tool.

use std::fs;
use std::path::{Path, PathBuf};

use crate::batch::InstallBatch;
use crate::coordinate::ArtifactCoordinate;
use crate::error::{Result, store_rejected};

/// Contract consumed by the install core.
pub trait RepositoryStore: Send + Sync {
    /// Path the coordinate would occupy in the local store. Pure and
    /// deterministic; the path need not exist.
    fn path_for_local_artifact(&self, coordinate: &ArtifactCoordinate) -> PathBuf;

    /// Installs every artifact in the batch, or fails identifying the cause.
    /// The batch is consumed; a failed call installs nothing the caller may
    /// rely on.
    fn install(&self, batch: InstallBatch) -> Result<()>;
}

/// Local artifact cache using the standard Maven directory layout.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    basedir: PathBuf,
}

impl LocalRepository {
    pub fn new(basedir: impl Into<PathBuf>) -> Self {
        Self {
            basedir: basedir.into(),
        }
    }

    /// The conventional `~/.m2/repository` location.
    pub fn default_location() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".m2").join("repository"))
    }

    pub fn basedir(&self) -> &Path {
        &self.basedir
    }

    fn layout_path(coordinate: &ArtifactCoordinate) -> PathBuf {
        let mut path = PathBuf::new();
        for segment in coordinate.group_id.split('.') {
            path.push(segment);
        }
        path.push(&coordinate.artifact_id);
        path.push(&coordinate.version);

        let mut name = format!("{}-{}", coordinate.artifact_id, coordinate.version);
        if coordinate.has_classifier() {
            name.push('-');
            name.push_str(&coordinate.classifier);
        }
        if !coordinate.extension.is_empty() {
            name.push('.');
            name.push_str(&coordinate.extension);
        }
        path.push(name);
        path
    }
}

impl RepositoryStore for LocalRepository {
    fn path_for_local_artifact(&self, coordinate: &ArtifactCoordinate) -> PathBuf {
        self.basedir.join(Self::layout_path(coordinate))
    }

    fn install(&self, batch: InstallBatch) -> Result<()> {
        for record in batch.records() {
            let target = self.path_for_local_artifact(&record.coordinate);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    store_rejected(format!(
                        "Failed to install {}: could not create {}: {}",
                        record.coordinate,
                        parent.display(),
                        e
                    ))
                })?;
            }
            fs::copy(&record.source_path, &target).map_err(|e| {
                store_rejected(format!(
                    "Failed to install {} to {}: {}",
                    record.coordinate,
                    target.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}
