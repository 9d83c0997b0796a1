//! Shared helpers for command implementations

use std::path::PathBuf;

use crate::error::{MinstallError, Result};
use crate::store::LocalRepository;

/// Opens the local repository at the override path or the default
/// `~/.m2/repository` location.
pub fn open_local_repository(override_path: Option<PathBuf>) -> Result<LocalRepository> {
    let basedir = match override_path {
        Some(path) => path,
        None => LocalRepository::default_location().ok_or_else(|| MinstallError::IoError {
            message: "could not determine the home directory for the default local repository"
                .to_string(),
        })?,
    };
    Ok(LocalRepository::new(basedir))
}
