//! Build module descriptors
//!
//! A module is one buildable unit within a multi-module build. The
//! descriptor carries everything the installable-set builder needs: the
//! module's identity, its packaging, the on-disk POM, the main artifact
//! file (if the packaging produces one) and any classified attachments.

use std::fmt;
use std::path::PathBuf;

/// Identity of a module within one build, used as the aggregator key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleId {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl ModuleId {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// An artifact attached to a module by the build, in declaration order.
#[derive(Debug, Clone)]
pub struct AttachedArtifact {
    pub classifier: String,
    pub extension: String,
    pub path: PathBuf,
}

impl AttachedArtifact {
    pub fn new(
        classifier: impl Into<String>,
        extension: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            classifier: classifier.into(),
            extension: extension.into(),
            path: path.into(),
        }
    }
}

/// A completed build module ready for installation.
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    pub id: ModuleId,
    pub packaging: String,
    /// The module's project descriptor file on disk (its pom.xml).
    pub pom_path: PathBuf,
    /// Main artifact file, absent when the packaging produced none.
    pub main_artifact: Option<PathBuf>,
    pub attached: Vec<AttachedArtifact>,
}

impl ModuleDescriptor {
    pub fn is_pom_packaging(&self) -> bool {
        self.packaging == "pom"
    }
}
