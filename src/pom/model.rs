//! Minimal POM document model
//!
//! Only the fields needed to extract or synthesize coordinates are
//! modeled; this is deliberately not a full project object model.
//! Reading and writing go through the quick-xml event API.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{MinstallError, Result, pom_parse_failed, pom_read_failed};

/// The `<parent>` block of a POM.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomParent {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
}

/// Subset of a POM document relevant to coordinate resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomModel {
    pub model_version: Option<String>,
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub description: Option<String>,
    pub parent: Option<PomParent>,
}

impl PomModel {
    /// The document's groupId, falling back to the parent block.
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or_else(|| self.parent.as_ref().and_then(|p| p.group_id.as_deref()))
    }

    /// The document's artifactId. There is no parent fallback: a child
    /// must declare its own artifactId.
    pub fn effective_artifact_id(&self) -> Option<&str> {
        self.artifact_id.as_deref()
    }

    /// The document's version, falling back to the parent block.
    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or_else(|| self.parent.as_ref().and_then(|p| p.version.as_deref()))
    }

    /// Declared packaging, defaulting to "jar" as POMs do.
    pub fn effective_packaging(&self) -> &str {
        self.packaging.as_deref().unwrap_or("jar")
    }
}

/// Generates a minimal model from user-supplied artifact information.
pub fn generate_model(group_id: &str, artifact_id: &str, version: &str, packaging: &str) -> PomModel {
    PomModel {
        model_version: Some("4.0.0".to_string()),
        group_id: Some(group_id.to_string()),
        artifact_id: Some(artifact_id.to_string()),
        version: Some(version.to_string()),
        packaging: Some(packaging.to_string()),
        description: Some("POM was created from install:install-file".to_string()),
        parent: None,
    }
}

/// Parsing context within the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseContext {
    Prolog,
    Project,
    Parent,
    /// Any subtree we do not model (dependencies, build, ...). The counter
    /// tracks nesting so we know when the subtree closes; `from_parent`
    /// records which context to restore.
    Skipped { depth: u32, from_parent: bool },
}

/// Parses a POM document from a string.
pub fn parse_model(content: &str, origin: &Path) -> Result<PomModel> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut model = PomModel::default();
    let mut context = ParseContext::Prolog;
    let mut current_tag: Option<String> = None;
    let mut saw_project = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| pom_parse_failed(origin.display().to_string(), e.to_string()))?;

        match event {
            Event::Start(ref e) => {
                let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                match (context, tag.as_str()) {
                    (ParseContext::Prolog, "project") => {
                        context = ParseContext::Project;
                        saw_project = true;
                    }
                    (ParseContext::Prolog, _) => {
                        return Err(pom_parse_failed(
                            origin.display().to_string(),
                            format!("expected <project> root element, found <{tag}>"),
                        ));
                    }
                    (ParseContext::Project, "parent") => {
                        context = ParseContext::Parent;
                        model.parent = Some(PomParent::default());
                    }
                    (
                        ParseContext::Project,
                        "modelVersion" | "groupId" | "artifactId" | "version" | "packaging"
                        | "description",
                    )
                    | (ParseContext::Parent, "groupId" | "artifactId" | "version") => {
                        current_tag = Some(tag);
                    }
                    (ParseContext::Project, _) => {
                        context = ParseContext::Skipped {
                            depth: 0,
                            from_parent: false,
                        };
                    }
                    (ParseContext::Parent, _) => {
                        context = ParseContext::Skipped {
                            depth: 0,
                            from_parent: true,
                        };
                    }
                    (ParseContext::Skipped { depth, from_parent }, _) => {
                        context = ParseContext::Skipped {
                            depth: depth + 1,
                            from_parent,
                        };
                    }
                }
            }
            Event::Text(ref e) => {
                if let Some(tag) = current_tag.take() {
                    let text = e
                        .decode()
                        .map_err(|err| {
                            pom_parse_failed(origin.display().to_string(), err.to_string())
                        })?
                        .trim()
                        .to_string();
                    match context {
                        ParseContext::Project => {
                            let field = match tag.as_str() {
                                "modelVersion" => &mut model.model_version,
                                "groupId" => &mut model.group_id,
                                "artifactId" => &mut model.artifact_id,
                                "version" => &mut model.version,
                                "packaging" => &mut model.packaging,
                                "description" => &mut model.description,
                                _ => continue,
                            };
                            *field = Some(text);
                        }
                        ParseContext::Parent => {
                            if let Some(parent) = model.parent.as_mut() {
                                let field = match tag.as_str() {
                                    "groupId" => &mut parent.group_id,
                                    "artifactId" => &mut parent.artifact_id,
                                    "version" => &mut parent.version,
                                    _ => continue,
                                };
                                *field = Some(text);
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::End(ref e) => {
                let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                current_tag = None;
                match context {
                    ParseContext::Parent if tag == "parent" => context = ParseContext::Project,
                    ParseContext::Skipped {
                        depth: 0,
                        from_parent,
                    } => {
                        context = if from_parent {
                            ParseContext::Parent
                        } else {
                            ParseContext::Project
                        };
                    }
                    ParseContext::Skipped { depth, from_parent } => {
                        context = ParseContext::Skipped {
                            depth: depth - 1,
                            from_parent,
                        };
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_project {
        return Err(pom_parse_failed(
            origin.display().to_string(),
            "no <project> root element",
        ));
    }

    Ok(model)
}

/// Reads and parses a POM document from disk.
///
/// An unreadable or unparsable POM is a hard error; callers that merely
/// probe for an embedded POM handle absence before calling this.
pub fn read_model(path: &Path) -> Result<PomModel> {
    let content = fs::read_to_string(path)
        .map_err(|e| pom_read_failed(path.display().to_string(), e.to_string()))?;
    parse_model(&content, path)
}

fn write_text_element<W: std::io::Write>(
    writer: &mut quick_xml::Writer<W>,
    tag: &str,
    value: &str,
) -> std::result::Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Serializes a model to POM XML.
pub fn render_model(model: &PomModel) -> Result<String> {
    let mut writer = quick_xml::Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    let render = |writer: &mut quick_xml::Writer<Cursor<Vec<u8>>>| -> std::result::Result<(), quick_xml::Error> {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new("project")))?;
        if let Some(v) = &model.model_version {
            write_text_element(writer, "modelVersion", v)?;
        }
        if let Some(parent) = &model.parent {
            writer.write_event(Event::Start(BytesStart::new("parent")))?;
            if let Some(v) = &parent.group_id {
                write_text_element(writer, "groupId", v)?;
            }
            if let Some(v) = &parent.artifact_id {
                write_text_element(writer, "artifactId", v)?;
            }
            if let Some(v) = &parent.version {
                write_text_element(writer, "version", v)?;
            }
            writer.write_event(Event::End(BytesEnd::new("parent")))?;
        }
        if let Some(v) = &model.group_id {
            write_text_element(writer, "groupId", v)?;
        }
        if let Some(v) = &model.artifact_id {
            write_text_element(writer, "artifactId", v)?;
        }
        if let Some(v) = &model.version {
            write_text_element(writer, "version", v)?;
        }
        if let Some(v) = &model.packaging {
            write_text_element(writer, "packaging", v)?;
        }
        if let Some(v) = &model.description {
            write_text_element(writer, "description", v)?;
        }
        writer.write_event(Event::End(BytesEnd::new("project")))?;
        Ok(())
    };

    render(&mut writer).map_err(|e| MinstallError::PomWriteFailed {
        reason: e.to_string(),
    })?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| MinstallError::PomWriteFailed {
        reason: e.to_string(),
    })
}

/// Writes a model to disk as POM XML.
pub fn write_model(model: &PomModel, path: &Path) -> Result<()> {
    let content = render_model(model)?;
    fs::write(path, content).map_err(|e| MinstallError::PomWriteFailed {
        reason: format!("{}: {}", path.display(), e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn origin() -> PathBuf {
        PathBuf::from("pom.xml")
    }

    #[test]
    fn test_parse_plain_pom() {
        let content = r#"<?xml version="1.0" encoding="UTF-8"?>
<project>
  <modelVersion>4.0.0</modelVersion>
  <groupId>com.example</groupId>
  <artifactId>widget</artifactId>
  <version>1.4</version>
  <packaging>jar</packaging>
  <description>A widget</description>
</project>"#;
        let model = parse_model(content, &origin()).unwrap();
        assert_eq!(model.model_version.as_deref(), Some("4.0.0"));
        assert_eq!(model.group_id.as_deref(), Some("com.example"));
        assert_eq!(model.artifact_id.as_deref(), Some("widget"));
        assert_eq!(model.version.as_deref(), Some("1.4"));
        assert_eq!(model.packaging.as_deref(), Some("jar"));
        assert!(model.parent.is_none());
    }

    #[test]
    fn test_parse_pom_with_parent_fallback() {
        let content = r#"<project>
  <modelVersion>4.0.0</modelVersion>
  <parent>
    <groupId>com.example</groupId>
    <artifactId>parent</artifactId>
    <version>2.0</version>
  </parent>
  <artifactId>child</artifactId>
</project>"#;
        let model = parse_model(content, &origin()).unwrap();
        assert_eq!(model.effective_group_id(), Some("com.example"));
        assert_eq!(model.effective_version(), Some("2.0"));
        assert_eq!(model.effective_artifact_id(), Some("child"));
        // The parent's artifactId must never leak into the child.
        assert_eq!(
            model.parent.as_ref().unwrap().artifact_id.as_deref(),
            Some("parent")
        );
    }

    #[test]
    fn test_parse_parent_with_relative_path() {
        let content = r#"<project>
  <parent>
    <groupId>com.example</groupId>
    <artifactId>parent</artifactId>
    <version>2.0</version>
    <relativePath>../pom.xml</relativePath>
  </parent>
  <artifactId>child</artifactId>
</project>"#;
        let model = parse_model(content, &origin()).unwrap();
        assert_eq!(model.effective_group_id(), Some("com.example"));
        assert_eq!(model.effective_version(), Some("2.0"));
        // relativePath must not bleed into any modeled field
        assert!(model.group_id.is_none());
    }

    #[test]
    fn test_parse_ignores_unmodeled_subtrees() {
        let content = r#"<project>
  <groupId>com.example</groupId>
  <dependencies>
    <dependency>
      <groupId>org.other</groupId>
      <artifactId>dep</artifactId>
      <version>9.9</version>
    </dependency>
  </dependencies>
  <artifactId>widget</artifactId>
  <version>1.0</version>
</project>"#;
        let model = parse_model(content, &origin()).unwrap();
        assert_eq!(model.group_id.as_deref(), Some("com.example"));
        assert_eq!(model.artifact_id.as_deref(), Some("widget"));
        assert_eq!(model.version.as_deref(), Some("1.0"));
    }

    #[test]
    fn test_parse_rejects_malformed_xml() {
        let result = parse_model("<project><groupId>x</project>", &origin());
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_non_pom_root() {
        let result = parse_model("<html><body/></html>", &origin());
        assert!(matches!(
            result.unwrap_err(),
            MinstallError::PomParseFailed { .. }
        ));
    }

    #[test]
    fn test_parse_rejects_empty_document() {
        let result = parse_model("", &origin());
        assert!(result.is_err());
    }

    #[test]
    fn test_default_packaging_is_jar() {
        let model = parse_model("<project><groupId>g</groupId></project>", &origin()).unwrap();
        assert_eq!(model.effective_packaging(), "jar");
    }

    #[test]
    fn test_generate_then_parse_round_trip() {
        let generated = generate_model("com.x", "a", "1.0", "jar");
        let xml = render_model(&generated).unwrap();
        let parsed = parse_model(&xml, &origin()).unwrap();

        assert_eq!(parsed.model_version.as_deref(), Some("4.0.0"));
        assert_eq!(parsed.group_id.as_deref(), Some("com.x"));
        assert_eq!(parsed.artifact_id.as_deref(), Some("a"));
        assert_eq!(parsed.version.as_deref(), Some("1.0"));
        assert_eq!(parsed.packaging.as_deref(), Some("jar"));
        assert!(
            parsed
                .description
                .as_deref()
                .unwrap()
                .contains("install:install-file")
        );
    }

    #[test]
    fn test_write_and_read_model_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generated.pom");
        let model = generate_model("com.x", "a", "1.0-SNAPSHOT", "war");
        write_model(&model, &path).unwrap();

        let parsed = read_model(&path).unwrap();
        assert_eq!(parsed.version.as_deref(), Some("1.0-SNAPSHOT"));
        assert_eq!(parsed.packaging.as_deref(), Some("war"));
    }

    #[test]
    fn test_read_model_missing_file() {
        let result = read_model(Path::new("/no/such/pom.xml"));
        assert!(matches!(
            result.unwrap_err(),
            MinstallError::PomReadFailed { .. }
        ));
    }
}
