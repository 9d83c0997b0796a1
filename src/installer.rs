//! Installable-set builder
//!
//! Turns either a completed build module or a standalone file plus explicit
//! coordinates into the batch of artifacts handed to the repository store.
//! All policy lives here: main-artifact presence rules, the self-install
//! guard and the generated-POM decision.

use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::batch::{ArtifactRecord, InstallBatch};
use crate::coordinate::{ArtifactCoordinate, ArtifactTypeRegistry, extension_from_path};
use crate::error::{MinstallError, Result};
use crate::pom::resolver::{self, PomSource};
use crate::project::ModuleDescriptor;
use crate::store::RepositoryStore;

/// Policy knobs for installing a build module.
#[derive(Debug, Clone, Default)]
pub struct ProjectInstallOptions {
    /// Install the POM and attachments even when the packaging assigned no
    /// main artifact file. Strict by default.
    pub allow_incomplete_projects: bool,
}

/// Batch built from a module, plus warnings for the caller to surface.
#[derive(Debug)]
pub struct ProjectBatch {
    pub batch: InstallBatch,
    pub warnings: Vec<String>,
}

/// Builds the installable set for a completed build module.
///
/// The module's own POM is always first in the batch. For non-pom packaging
/// the main artifact file must exist; a module with attachments but no main
/// file fails unless `allow_incomplete_projects` is set.
pub fn build_project_batch(
    module: &ModuleDescriptor,
    options: &ProjectInstallOptions,
) -> Result<ProjectBatch> {
    let registry = ArtifactTypeRegistry;
    let mut batch = InstallBatch::new();
    let mut warnings = Vec::new();

    if !module.pom_path.is_file() {
        return Err(MinstallError::ProjectPomMissing {
            path: module.pom_path.display().to_string(),
        });
    }
    let pom_coordinate = ArtifactCoordinate::new(
        module.id.group_id.clone(),
        module.id.artifact_id.clone(),
        module.id.version.clone(),
        "",
        "pom",
    );
    batch.add(ArtifactRecord::new(pom_coordinate, &module.pom_path));

    if !module.is_pom_packaging() {
        let main_file = module
            .main_artifact
            .as_deref()
            .filter(|path| path.is_file());
        match main_file {
            Some(path) => {
                let artifact_type = registry.get(&module.packaging);
                let extension = artifact_type
                    .as_ref()
                    .map(|t| t.extension.to_string())
                    .unwrap_or_else(|| module.packaging.clone());
                let classifier = artifact_type.map(|t| t.classifier).unwrap_or_default();
                let coordinate = ArtifactCoordinate::new(
                    module.id.group_id.clone(),
                    module.id.artifact_id.clone(),
                    module.id.version.clone(),
                    classifier,
                    extension,
                );
                batch.add(ArtifactRecord::new(coordinate, path));
            }
            None if module.attached.is_empty() => {
                return Err(MinstallError::NoMainArtifact);
            }
            None if !options.allow_incomplete_projects => {
                return Err(MinstallError::MainArtifactMissing);
            }
            None => {
                warnings.push(format!(
                    "Module {} has attachments but no main artifact; installing without it",
                    module.id
                ));
            }
        }
    }

    for attached in &module.attached {
        let coordinate = ArtifactCoordinate::new(
            module.id.group_id.clone(),
            module.id.artifact_id.clone(),
            module.id.version.clone(),
            attached.classifier.clone(),
            attached.extension.clone(),
        );
        batch.add(ArtifactRecord::new(coordinate, &attached.path));
    }

    Ok(ProjectBatch { batch, warnings })
}

/// Standalone file install, with coordinates already completed from the
/// resolved POM (missing fields filled in by the caller).
#[derive(Debug)]
pub struct FileInstallRequest {
    pub file: PathBuf,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub packaging: String,
    pub classifier: Option<String>,
    /// Resolution outcome for the accompanying POM; owns any extracted
    /// temp file.
    pub pom_source: PomSource,
    pub sources: Option<PathBuf>,
    pub javadoc: Option<PathBuf>,
    /// Tri-state: forced on, forced off, or decided by local store contents.
    pub generate_pom: Option<bool>,
}

/// Batch built from a standalone file.
///
/// Holds the POM source and any generated temp POM so their files outlive
/// the store call; dropping this after the install deletes them exactly once.
#[derive(Debug)]
pub struct FileBatch {
    pub batch: InstallBatch,
    pub pom_source: PomSource,
    pub generated_pom: Option<NamedTempFile>,
    pub notes: Vec<String>,
}

/// Builds the installable set for a standalone file.
pub fn build_file_batch(request: FileInstallRequest, store: &dyn RepositoryStore) -> Result<FileBatch> {
    let registry = ArtifactTypeRegistry;
    let mut notes = Vec::new();

    if !crate::coordinate::is_valid_id(&request.group_id)
        || !crate::coordinate::is_valid_id(&request.artifact_id)
        || !crate::coordinate::is_valid_version(&request.version)
    {
        return Err(MinstallError::InvalidCoordinates);
    }

    // A pom-packaged file with no classifier IS the POM artifact.
    let is_file_pom = request.classifier.is_none() && request.packaging == "pom";

    let classifier = match &request.classifier {
        Some(c) => c.clone(),
        None if !is_file_pom => registry
            .default_classifier(&request.packaging)
            .unwrap_or_default()
            .to_string(),
        None => String::new(),
    };
    let extension = if is_file_pom {
        "pom".to_string()
    } else {
        extension_from_path(&request.file)
    };

    let main_coordinate = ArtifactCoordinate::new(
        request.group_id.clone(),
        request.artifact_id.clone(),
        request.version.clone(),
        classifier,
        extension,
    );

    let local_path = store.path_for_local_artifact(&main_coordinate);
    if same_file(&request.file, &local_path) {
        return Err(MinstallError::SelfInstall {
            path: request.file.display().to_string(),
        });
    }

    let mut batch = InstallBatch::new();
    batch.add(ArtifactRecord::new(main_coordinate.clone(), &request.file));

    let mut generated_pom = None;
    if request.packaging != "pom" {
        let pom_coordinate = main_coordinate.pom_sub_coordinate();
        let force_generate = request.generate_pom == Some(true);
        match &request.pom_source {
            // An explicit POM is always installed as-is; forced generation
            // only overrides a POM found inside the artifact.
            PomSource::Explicit { path, .. } => {
                batch.add(ArtifactRecord::new(pom_coordinate, path));
            }
            PomSource::Embedded { file, .. } if !force_generate => {
                batch.add(ArtifactRecord::new(pom_coordinate, file.path()));
            }
            _ => {
                let temp = resolver::generate_pom_file(
                    &request.group_id,
                    &request.artifact_id,
                    &request.version,
                    &request.packaging,
                )?;
                let local_pom_exists = store.path_for_local_artifact(&pom_coordinate).exists();
                if force_generate || (request.generate_pom.is_none() && !local_pom_exists) {
                    notes.push("Installing generated POM".to_string());
                    batch.add(ArtifactRecord::new(pom_coordinate, temp.path()));
                } else if request.generate_pom.is_none() {
                    notes.push(
                        "Skipping installation of generated POM, already present in local repository"
                            .to_string(),
                    );
                }
                generated_pom = Some(temp);
            }
        }
    }

    if let Some(sources) = &request.sources {
        batch.add(ArtifactRecord::new(
            main_coordinate.sub_coordinate("sources", "jar"),
            sources,
        ));
    }
    if let Some(javadoc) = &request.javadoc {
        batch.add(ArtifactRecord::new(
            main_coordinate.sub_coordinate("javadoc", "jar"),
            javadoc,
        ));
    }

    Ok(FileBatch {
        batch,
        pom_source: request.pom_source,
        generated_pom,
        notes,
    })
}

/// Path equality that survives `./` and symlink spellings when both paths
/// exist; falls back to literal comparison otherwise.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
