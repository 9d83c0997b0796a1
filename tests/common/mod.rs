//! Common test utilities for minstall integration tests

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch area with its own local repository for integration tests
#[allow(dead_code)]
pub struct TestWorkspace {
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Working directory for input files
    pub path: PathBuf,
    /// Local repository directory handed to the binary via -r
    pub repo: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("work");
        let repo = temp.path().join("repo");
        std::fs::create_dir_all(&path).expect("Failed to create work directory");
        std::fs::create_dir_all(&repo).expect("Failed to create repo directory");
        Self { temp, path, repo }
    }

    /// Write a file under the work directory
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Write a jar (zip) file with the given entries under the work directory
    pub fn write_jar(&self, name: &str, entries: &[(&str, &str)]) -> PathBuf {
        let path = self.path.join(name);
        write_jar_at(&path, entries);
        path
    }

    /// Path an artifact would occupy in this workspace's repository
    pub fn repo_path(&self, relative: &str) -> PathBuf {
        self.repo.join(relative)
    }
}

pub fn write_jar_at(path: &Path, entries: &[(&str, &str)]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    let file = std::fs::File::create(path).expect("Failed to create jar file");
    let mut jar = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    for (name, content) in entries {
        jar.start_file(*name, options).expect("Failed to start jar entry");
        jar.write_all(content.as_bytes())
            .expect("Failed to write jar entry");
    }
    jar.finish().expect("Failed to finish jar");
}

/// A minimal POM document for the given coordinates
#[allow(dead_code)]
pub fn pom_xml(group_id: &str, artifact_id: &str, version: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<project>
  <modelVersion>4.0.0</modelVersion>
  <groupId>{group_id}</groupId>
  <artifactId>{artifact_id}</artifactId>
  <version>{version}</version>
</project>
"#
    )
}
