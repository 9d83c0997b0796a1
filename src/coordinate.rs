//! Artifact coordinates and validation
//!
//! A coordinate is the (groupId, artifactId, version, classifier, extension)
//! tuple that addresses an artifact in a Maven-layout repository. Validation
//! happens before any batch is built; a failing coordinate aborts the whole
//! operation.

use std::fmt;
use std::path::Path;

/// Characters that must never appear in a plain (non-range) version string.
const ILLEGAL_VERSION_CHARS: &str = "\\/:\"<>|?*[](){},";

/// Returns `true` if the string is a valid group or artifact id.
///
/// Only ASCII letters, digits, `-`, `_` and `.` are allowed. Empty is invalid.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

/// Returns `true` if the string is a valid plain version.
///
/// Ranges and expressions are not versions, so any of `\/:"<>|?*[](){},`
/// makes the string invalid.
pub fn is_valid_version(version: &str) -> bool {
    !version.chars().any(|c| ILLEGAL_VERSION_CHARS.contains(c))
}

/// Derives an artifact extension from a filename.
///
/// Honors the various `tar.*` combinations: `foo-1.0.tar.gz` yields `tar.gz`.
/// A name with no dot yields the empty string.
pub fn extension_from_filename(filename: &str) -> String {
    let last = filename.rsplit('.').next().filter(|_| filename.contains('.'));
    match last {
        Some(ext) if filename.contains(".tar.") => format!("tar.{ext}"),
        Some(ext) => ext.to_string(),
        None => String::new(),
    }
}

/// Derives an artifact extension from a file path's final component.
pub fn extension_from_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(extension_from_filename)
        .unwrap_or_default()
}

/// Full address of an artifact in the local repository.
///
/// An empty classifier means "none"; the two spellings compare equal because
/// the field is normalized at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactCoordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: String,
    pub extension: String,
}

impl ArtifactCoordinate {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        classifier: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            classifier: classifier.into(),
            extension: extension.into(),
        }
    }

    /// Validates the id and version fields against the character rules.
    pub fn is_valid(&self) -> bool {
        is_valid_id(&self.group_id)
            && is_valid_id(&self.artifact_id)
            && is_valid_version(&self.version)
    }

    pub fn has_classifier(&self) -> bool {
        !self.classifier.is_empty()
    }

    /// The POM sub-artifact accompanying this main artifact.
    pub fn pom_sub_coordinate(&self) -> ArtifactCoordinate {
        ArtifactCoordinate::new(
            self.group_id.clone(),
            self.artifact_id.clone(),
            self.version.clone(),
            "",
            "pom",
        )
    }

    /// A sub-artifact sharing this coordinate's G:A:V (e.g. sources, javadoc).
    pub fn sub_coordinate(&self, classifier: &str, extension: &str) -> ArtifactCoordinate {
        ArtifactCoordinate::new(
            self.group_id.clone(),
            self.artifact_id.clone(),
            self.version.clone(),
            classifier,
            extension,
        )
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        write!(f, ":{}", self.extension)?;
        if self.has_classifier() {
            write!(f, ":{}", self.classifier)?;
        }
        write!(f, ":{}", self.version)
    }
}

/// Declared artifact type: the extension and default classifier implied by a
/// packaging.
#[derive(Debug, Clone)]
pub struct ArtifactType {
    pub extension: &'static str,
    pub classifier: &'static str,
}

/// Maps packaging names to their artifact types, mirroring the stock types
/// a repository session registers.
#[derive(Debug, Default)]
pub struct ArtifactTypeRegistry;

impl ArtifactTypeRegistry {
    pub fn get(&self, packaging: &str) -> Option<ArtifactType> {
        let (extension, classifier) = match packaging {
            "pom" => ("pom", ""),
            "jar" | "maven-plugin" | "ejb" => ("jar", ""),
            "war" => ("war", ""),
            "ear" => ("ear", ""),
            "rar" => ("rar", ""),
            "test-jar" => ("jar", "tests"),
            "ejb-client" => ("jar", "client"),
            "java-source" => ("jar", "sources"),
            "javadoc" => ("jar", "javadoc"),
            _ => return None,
        };
        Some(ArtifactType {
            extension,
            classifier,
        })
    }

    /// The classifier a coordinate gets when the caller supplied none and the
    /// packaging implies one (e.g. `test-jar` implies `tests`).
    pub fn default_classifier(&self, packaging: &str) -> Option<&'static str> {
        self.get(packaging)
            .map(|t| t.classifier)
            .filter(|c| !c.is_empty())
    }
}
