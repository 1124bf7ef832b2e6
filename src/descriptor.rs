use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use thiserror::Error;

use crate::models::DependencyRecord;

/// Namespace every element of a POM descriptor must live in to be read.
pub const POM_NAMESPACE: &str = "http://maven.apache.org/POM/4.0.0";

/// Default descriptor file name inside `repo/name/version/`.
pub const DEFAULT_DESCRIPTOR: &str = "pom.xml";

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("failed to read descriptor {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed descriptor {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

/// Location of a package's descriptor: `repo/name/version/file`.
pub fn descriptor_path(repo: &Path, name: &str, version: &str, file: &str) -> PathBuf {
    repo.join(name).join(version).join(file)
}

/// Read the declared dependencies of one descriptor.
///
/// Returns `Ok(None)` when the file does not exist. A file that exists but is
/// not well-formed XML is an error.
pub fn read_descriptor(path: &Path) -> Result<Option<Vec<DependencyRecord>>, DescriptorError> {
    if !path.exists() {
        tracing::debug!("no descriptor at {}", path.display());
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|source| DescriptorError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_dependencies(&content)
        .map(Some)
        .map_err(|reason| DescriptorError::Malformed {
            path: path.to_path_buf(),
            reason,
        })
}

#[derive(Debug, Clone, Copy)]
enum Field {
    GroupId,
    ArtifactId,
    Version,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"groupId" => Some(Field::GroupId),
            b"artifactId" => Some(Field::ArtifactId),
            b"version" => Some(Field::Version),
            _ => None,
        }
    }
}

/// A `<dependency>` being filled in. The first occurrence of each field wins.
#[derive(Default)]
struct PendingRecord {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
}

impl PendingRecord {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::GroupId => &mut self.group_id,
            Field::ArtifactId => &mut self.artifact_id,
            Field::Version => &mut self.version,
        }
    }

    /// Start capturing `field`; returns `false` if it was already seen.
    fn open(&mut self, field: Field) -> bool {
        let slot = self.slot(field);
        if slot.is_some() {
            return false;
        }
        *slot = Some(String::new());
        true
    }

    fn finish(self) -> DependencyRecord {
        DependencyRecord {
            group_id: self.group_id.unwrap_or_default(),
            artifact_id: self.artifact_id.unwrap_or_default(),
            version: self.version.unwrap_or_default(),
        }
    }
}

/// Reject malformed or unescapable attributes on an element.
fn check_attributes(e: &BytesStart) -> Result<(), String> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        attr.unescape_value().map_err(|e| e.to_string())?;
    }
    Ok(())
}

// Element levels, counting the document root as 1.
const DEPENDENCIES_LEVEL: usize = 2;
const DEPENDENCY_LEVEL: usize = 3;
const FIELD_LEVEL: usize = 4;

/// Extract `project/dependencies/dependency` entries from a POM document.
///
/// Only elements bound to [`POM_NAMESPACE`] are considered, so
/// `dependencyManagement` and plugin dependencies are skipped.
fn parse_dependencies(xml: &str) -> Result<Vec<DependencyRecord>, String> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut deps = Vec::new();
    let mut buf = Vec::new();

    let mut depth: usize = 0;
    let mut seen_root = false;
    let mut in_dependencies = false;
    let mut current: Option<PendingRecord> = None;
    let mut capturing: Option<Field> = None;

    loop {
        let (ns, event) = reader
            .read_resolved_event_into(&mut buf)
            .map_err(|e| e.to_string())?;
        let in_pom = matches!(ns, ResolveResult::Bound(Namespace(n)) if n == POM_NAMESPACE.as_bytes());

        match event {
            Event::Start(ref e) => {
                if depth == 0 && seen_root {
                    return Err("content after the document element".to_string());
                }
                check_attributes(e)?;
                seen_root = true;
                depth += 1;
                let tag = e.local_name();

                match depth {
                    DEPENDENCIES_LEVEL if in_pom && tag.as_ref() == b"dependencies" => {
                        in_dependencies = true;
                    }
                    DEPENDENCY_LEVEL
                        if in_dependencies && in_pom && tag.as_ref() == b"dependency" =>
                    {
                        current = Some(PendingRecord::default());
                    }
                    FIELD_LEVEL if in_pom => {
                        if let (Some(record), Some(field)) =
                            (current.as_mut(), Field::from_tag(tag.as_ref()))
                        {
                            if record.open(field) {
                                capturing = Some(field);
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::Empty(ref e) => {
                if depth == 0 && seen_root {
                    return Err("content after the document element".to_string());
                }
                check_attributes(e)?;
                seen_root = true;
                let tag = e.local_name();

                match depth + 1 {
                    DEPENDENCY_LEVEL
                        if in_dependencies && in_pom && tag.as_ref() == b"dependency" =>
                    {
                        deps.push(DependencyRecord::default());
                    }
                    FIELD_LEVEL if in_pom => {
                        if let (Some(record), Some(field)) =
                            (current.as_mut(), Field::from_tag(tag.as_ref()))
                        {
                            record.open(field);
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(ref e) => {
                let text = e.unescape().map_err(|e| e.to_string())?;
                if depth == 0 && !text.trim().is_empty() {
                    return Err("text outside the document element".to_string());
                }
                if let (Some(record), Some(field)) = (current.as_mut(), capturing) {
                    if let Some(value) = record.slot(field) {
                        value.push_str(&text);
                    }
                }
            }
            Event::CData(ref e) => {
                if depth == 0 {
                    return Err("CDATA outside the document element".to_string());
                }
                if let (Some(record), Some(field)) = (current.as_mut(), capturing) {
                    if let Some(value) = record.slot(field) {
                        value.push_str(&String::from_utf8_lossy(e));
                    }
                }
            }
            Event::End(_) => {
                match depth {
                    FIELD_LEVEL => capturing = None,
                    DEPENDENCY_LEVEL => {
                        if let Some(record) = current.take() {
                            deps.push(record.finish());
                        }
                    }
                    DEPENDENCIES_LEVEL => in_dependencies = false,
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err("no element found".to_string());
    }
    if depth > 0 {
        return Err(format!("unexpected end of document, {} element(s) left open", depth));
    }

    Ok(deps)
}
