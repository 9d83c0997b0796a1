//! POM resolution precedence
//!
//! Evaluated once per install operation, short-circuiting at first success:
//! an explicit POM path wins, then a POM embedded in the artifact's jar,
//! then nothing. "Nothing" is a normal outcome, never an error; the caller
//! either has complete coordinates or generates a minimal POM.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use regex::Regex;
use tempfile::NamedTempFile;

use crate::error::{MinstallError, Result, pom_parse_failed};
use crate::pom::model::{self, PomModel};

/// Where the POM accompanying a main artifact came from.
///
/// `Embedded` owns the extracted temp file; dropping the source deletes it,
/// so cleanup happens exactly once whether the install succeeded or not.
#[derive(Debug)]
pub enum PomSource {
    Explicit { path: PathBuf, model: PomModel },
    Embedded { file: NamedTempFile, model: PomModel },
    None,
}

impl PomSource {
    pub fn model(&self) -> Option<&PomModel> {
        match self {
            PomSource::Explicit { model, .. } | PomSource::Embedded { model, .. } => Some(model),
            PomSource::None => None,
        }
    }

    /// Path of the POM file on disk, if any source was found.
    pub fn path(&self) -> Option<&Path> {
        match self {
            PomSource::Explicit { path, .. } => Some(path),
            PomSource::Embedded { file, .. } => Some(file.path()),
            PomSource::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, PomSource::None)
    }
}

/// Resolves the POM source for a main artifact file.
///
/// An explicit POM that cannot be read or parsed is a hard error. Probing
/// the artifact for an embedded POM is best-effort: a file that is not a
/// zip container, or one without a matching entry, resolves to
/// [`PomSource::None`]. A matching entry that fails to parse is still a
/// hard error.
pub fn resolve_pom(explicit_pom: Option<&Path>, artifact_file: &Path) -> Result<PomSource> {
    if let Some(path) = explicit_pom {
        let model = model::read_model(path)?;
        return Ok(PomSource::Explicit {
            path: path.to_path_buf(),
            model,
        });
    }

    match extract_embedded_pom(artifact_file)? {
        Some((file, model)) => Ok(PomSource::Embedded { file, model }),
        None => Ok(PomSource::None),
    }
}

/// Extracts `META-INF/maven/.../pom.xml` from a jar-like container.
///
/// The entry pattern deliberately allows nested paths below `META-INF/maven/`
/// (the historical behavior); the first match in archive order is taken.
fn extract_embedded_pom(artifact_file: &Path) -> Result<Option<(NamedTempFile, PomModel)>> {
    #[allow(clippy::unwrap_used)] // the pattern is a literal
    let pom_entry = Regex::new(r"^META-INF/maven/.*/pom\.xml$").unwrap();

    let Ok(file) = File::open(artifact_file) else {
        return Ok(None);
    };
    // Not being a zip container is expected for artifacts not packaged
    // as jars; skip probing without complaint.
    let Ok(mut archive) = zip::ZipArchive::new(file) else {
        return Ok(None);
    };

    for index in 0..archive.len() {
        let Ok(mut entry) = archive.by_index(index) else {
            return Ok(None);
        };
        if !pom_entry.is_match(entry.name()) {
            continue;
        }

        let entry_name = entry.name().to_string();
        let mut content = String::new();
        if entry.read_to_string(&mut content).is_err() {
            // A corrupt entry means the artifact was not packaged by Maven;
            // treat it like no match.
            return Ok(None);
        }

        let model = model::parse_model(&content, Path::new(&entry_name)).map_err(|e| {
            pom_parse_failed(
                format!("{} ({})", entry_name, artifact_file.display()),
                e.to_string(),
            )
        })?;

        let temp = pom_temp_file(artifact_file)?;
        std::fs::write(temp.path(), &content)?;
        return Ok(Some((temp, model)));
    }

    Ok(None)
}

/// Generates a temporary minimal POM for the given coordinates.
///
/// The returned handle owns the file; it is deleted on drop.
pub fn generate_pom_file(
    group_id: &str,
    artifact_id: &str,
    version: &str,
    packaging: &str,
) -> Result<NamedTempFile> {
    let model = model::generate_model(group_id, artifact_id, version, packaging);
    let temp = tempfile::Builder::new()
        .prefix("minstall")
        .suffix(".pom")
        .tempfile()
        .map_err(|e| MinstallError::IoError {
            message: format!("could not create temporary POM file: {e}"),
        })?;
    model::write_model(&model, temp.path())?;
    Ok(temp)
}

/// Names the temp file after the artifact, the way extracted POMs have
/// always been named.
fn pom_temp_file(artifact_file: &Path) -> Result<NamedTempFile> {
    let base = artifact_file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("minstall");
    tempfile::Builder::new()
        .prefix(base)
        .suffix(".pom")
        .tempfile()
        .map_err(|e| MinstallError::IoError {
            message: format!("could not create temporary POM file: {e}"),
        })
}
