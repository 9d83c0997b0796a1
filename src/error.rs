//! Error types and handling for minstall
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for minstall operations
#[derive(Error, Diagnostic, Debug)]
pub enum MinstallError {
    // Coordinate errors
    #[error("The artifact information is not valid: uses invalid characters")]
    #[diagnostic(
        code(minstall::coordinate::invalid),
        help(
            "Group and artifact ids may contain ASCII letters, digits, '-', '_' and '.'; \
             versions must not contain any of \\/:\"<>|?*[](){{}},"
        )
    )]
    InvalidCoordinates,

    #[error("The artifact information is incomplete: {missing} required")]
    #[diagnostic(
        code(minstall::coordinate::incomplete),
        help("Supply the missing fields on the command line or point at a POM that declares them")
    )]
    IncompleteCoordinates { missing: String },

    // Project errors
    #[error("The project POM could not be attached: {path}")]
    #[diagnostic(
        code(minstall::project::pom_missing),
        help("Every module must have a readable project descriptor on disk")
    )]
    ProjectPomMissing { path: String },

    #[error("The packaging for this project did not assign a file to the build artifact")]
    #[diagnostic(code(minstall::project::no_main_artifact))]
    NoMainArtifact,

    #[error(
        "The project has attachments but no main artifact file; change packaging to 'pom' \
         or build the main artifact first"
    )]
    #[diagnostic(
        code(minstall::project::main_artifact_missing),
        help("Pass --allow-incomplete to install the POM and attachments anyway")
    )]
    MainArtifactMissing,

    // Standalone file install errors
    #[error("The specified file '{path}' does not exist")]
    #[diagnostic(code(minstall::file::not_found))]
    FileNotFound { path: String },

    #[error(
        "Cannot install artifact: the file is already in the local repository\n\nFile in question is: {path}"
    )]
    #[diagnostic(
        code(minstall::file::self_install),
        help("The source file must live outside the local repository")
    )]
    SelfInstall { path: String },

    #[error("Invalid attachment spec '{spec}': expected classifier[:extension]=path")]
    #[diagnostic(
        code(minstall::project::invalid_attachment),
        help("Example: --attach sources=target/app-1.0-sources.jar")
    )]
    InvalidAttachment { spec: String },

    // POM errors
    #[error("Error reading POM {path}: {reason}")]
    #[diagnostic(code(minstall::pom::read_failed))]
    PomReadFailed { path: String, reason: String },

    #[error("Error parsing POM {path}: {reason}")]
    #[diagnostic(code(minstall::pom::parse_failed))]
    PomParseFailed { path: String, reason: String },

    #[error("Error writing POM file: {reason}")]
    #[diagnostic(code(minstall::pom::write_failed))]
    PomWriteFailed { reason: String },

    // Store errors
    #[error("{message}")]
    #[diagnostic(code(minstall::store::rejected))]
    StoreRejected { message: String },

    // Aggregator errors
    #[error("Build graph inconsistency: {message}")]
    #[diagnostic(
        code(minstall::build::graph_inconsistency),
        help("This indicates a bug in the build driver, not in the project being built")
    )]
    BuildGraphInconsistency { message: String },

    // File system errors
    #[error("IO error: {message}")]
    #[diagnostic(code(minstall::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for MinstallError {
    fn from(err: std::io::Error) -> Self {
        MinstallError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, MinstallError>;

pub fn incomplete_coordinates(missing: impl Into<String>) -> MinstallError {
    MinstallError::IncompleteCoordinates {
        missing: missing.into(),
    }
}

pub fn pom_read_failed(path: impl Into<String>, reason: impl Into<String>) -> MinstallError {
    MinstallError::PomReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

pub fn pom_parse_failed(path: impl Into<String>, reason: impl Into<String>) -> MinstallError {
    MinstallError::PomParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

pub fn store_rejected(message: impl Into<String>) -> MinstallError {
    MinstallError::StoreRejected {
        message: message.into(),
    }
}

pub fn build_graph_inconsistency(message: impl Into<String>) -> MinstallError {
    MinstallError::BuildGraphInconsistency {
        message: message.into(),
    }
}
