//! Install command implementation
//!
//! Installs a built module: its POM, main artifact and attachments. The
//! module runs through the per-build coordinator even as a single-module
//! build, so skip/immediate/deferred all take the same code path a
//! multi-module driver would use.

use std::path::PathBuf;
use std::sync::Arc;

use console::style;

use crate::cli::InstallArgs;
use crate::commands::helpers;
use crate::coordinator::{BuildInstallCoordinator, ModuleDisposition};
use crate::error::{MinstallError, Result, incomplete_coordinates};
use crate::installer::{self, ProjectInstallOptions};
use crate::pom;
use crate::project::{AttachedArtifact, ModuleDescriptor, ModuleId};

/// Parses an `--attach` spec of the form `classifier[:extension]=path`.
fn parse_attachment(spec: &str) -> Result<AttachedArtifact> {
    let invalid = || MinstallError::InvalidAttachment {
        spec: spec.to_string(),
    };
    let (front, path) = spec.split_once('=').ok_or_else(invalid)?;
    if front.is_empty() || path.is_empty() {
        return Err(invalid());
    }
    let (classifier, extension) = match front.split_once(':') {
        Some((classifier, extension)) if !classifier.is_empty() && !extension.is_empty() => {
            (classifier, extension)
        }
        Some(_) => return Err(invalid()),
        None => (front, "jar"),
    };
    Ok(AttachedArtifact::new(classifier, extension, path))
}

fn module_from_args(args: &InstallArgs) -> Result<ModuleDescriptor> {
    let model = pom::read_model(&args.pom)?;
    let group_id = model
        .effective_group_id()
        .ok_or_else(|| incomplete_coordinates("the POM declares no groupId; 'groupId' is"))?;
    let artifact_id = model
        .effective_artifact_id()
        .ok_or_else(|| incomplete_coordinates("the POM declares no artifactId; 'artifactId' is"))?;
    let version = model
        .effective_version()
        .ok_or_else(|| incomplete_coordinates("the POM declares no version; 'version' is"))?;

    let attached = args
        .attach
        .iter()
        .map(|spec| parse_attachment(spec))
        .collect::<Result<Vec<_>>>()?;

    Ok(ModuleDescriptor {
        id: ModuleId::new(group_id, artifact_id, version),
        packaging: model.effective_packaging().to_string(),
        pom_path: args.pom.clone(),
        main_artifact: args.file.clone(),
        attached,
    })
}

/// Run install command
pub fn run(local_repository: Option<PathBuf>, verbose: bool, args: InstallArgs) -> Result<()> {
    let store = helpers::open_local_repository(local_repository)?;
    if verbose {
        println!(
            "{}",
            style(format!("Using local repository {}", store.basedir().display())).dim()
        );
    }
    let module = module_from_args(&args)?;
    let id = module.id.clone();

    let coordinator = BuildInstallCoordinator::new(vec![id.clone()], Arc::new(store));

    if args.skip {
        println!("{}", style("Skipping artifact installation").dim());
        return coordinator.submit(&id, ModuleDisposition::Skip);
    }

    let options = ProjectInstallOptions {
        allow_incomplete_projects: args.allow_incomplete,
    };
    let project_batch = installer::build_project_batch(&module, &options)?;
    for warning in &project_batch.warnings {
        eprintln!("{} {}", style("warning:").yellow().bold(), warning);
    }

    let count = project_batch.batch.len();
    if args.install_at_end {
        println!("{}", style(format!("Deferring install for {id} at end")).dim());
        coordinator.submit(&id, ModuleDisposition::Defer(project_batch.batch))?;
    } else {
        coordinator.submit(&id, ModuleDisposition::Install(project_batch.batch))?;
    }

    println!(
        "{} {count} artifact(s) for {id}",
        style("Installed").green().bold()
    );
    Ok(())
}
