//! Install-file command implementation
//!
//! Installs a standalone file under explicit coordinates. Missing
//! coordinate fields are filled from the explicit POM or from a POM found
//! inside the jar; what is still missing afterwards is a configuration
//! error.

use std::path::PathBuf;

use console::style;

use crate::cli::InstallFileArgs;
use crate::commands::helpers;
use crate::error::{MinstallError, Result, incomplete_coordinates};
use crate::installer::{self, FileBatch, FileInstallRequest};
use crate::pom::{self, PomModel};
use crate::store::RepositoryStore;

/// Coordinate fields as given on the command line, before POM completion.
struct Coordinates {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    packaging: Option<String>,
}

impl Coordinates {
    fn from_args(args: &InstallFileArgs) -> Self {
        Self {
            group_id: args.group_id.clone(),
            artifact_id: args.artifact_id.clone(),
            version: args.version.clone(),
            packaging: args.packaging.clone(),
        }
    }

    /// Fills absent fields from a parsed POM. groupId and version fall back
    /// to the POM's parent block; artifactId never does.
    fn complete_from(&mut self, model: &PomModel) {
        if self.group_id.is_none() {
            self.group_id = model.effective_group_id().map(String::from);
        }
        if self.artifact_id.is_none() {
            self.artifact_id = model.effective_artifact_id().map(String::from);
        }
        if self.version.is_none() {
            self.version = model.effective_version().map(String::from);
        }
        if self.packaging.is_none() {
            // A parsed POM always has a packaging; unset means "jar".
            self.packaging = Some(model.effective_packaging().to_string());
        }
    }

    fn into_complete(self) -> Result<(String, String, String, String)> {
        let mut missing = Vec::new();
        if self.group_id.is_none() {
            missing.push("'groupId'");
        }
        if self.artifact_id.is_none() {
            missing.push("'artifactId'");
        }
        if self.version.is_none() {
            missing.push("'version'");
        }
        if self.packaging.is_none() {
            missing.push("'packaging'");
        }
        match (self.group_id, self.artifact_id, self.version, self.packaging) {
            (Some(g), Some(a), Some(v), Some(p)) => Ok((g, a, v, p)),
            _ => Err(incomplete_coordinates(format!("{} are", missing.join(", ")))),
        }
    }
}

/// Run install-file command
pub fn run(local_repository: Option<PathBuf>, verbose: bool, args: InstallFileArgs) -> Result<()> {
    if !args.file.exists() {
        return Err(MinstallError::FileNotFound {
            path: args.file.display().to_string(),
        });
    }

    let store = helpers::open_local_repository(local_repository)?;
    if verbose {
        println!(
            "{}",
            style(format!("Using local repository {}", store.basedir().display())).dim()
        );
    }

    let pom_source = pom::resolve_pom(args.pom_file.as_deref(), &args.file)?;
    if pom_source.is_none() && args.pom_file.is_none() {
        let name = args
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| args.file.display().to_string());
        println!("{}", style(format!("pom.xml not found in {name}")).dim());
    }

    let mut coordinates = Coordinates::from_args(&args);
    if let Some(model) = pom_source.model() {
        coordinates.complete_from(model);
    }
    let (group_id, artifact_id, version, packaging) = coordinates.into_complete()?;

    let request = FileInstallRequest {
        file: args.file,
        group_id,
        artifact_id,
        version,
        packaging,
        classifier: args.classifier,
        pom_source,
        sources: args.sources,
        javadoc: args.javadoc,
        generate_pom: args.generate_pom,
    };

    let FileBatch {
        batch,
        pom_source,
        generated_pom,
        notes,
    } = installer::build_file_batch(request, &store)?;
    for note in &notes {
        println!("{}", style(note).dim());
    }

    let coordinate = batch.records()[0].coordinate.clone();
    let count = batch.len();
    let outcome = store.install(batch);
    // Temporary POMs are deleted here, after the store call, on both paths.
    drop(pom_source);
    drop(generated_pom);
    outcome?;

    println!(
        "{} {coordinate} ({count} artifact(s)) into {}",
        style("Installed").green().bold(),
        store.basedir().display()
    );
    Ok(())
}
