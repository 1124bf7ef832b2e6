/// Identity of one package instance in the repository.
///
/// A key without a version is a bare reference: it is recorded as an edge
/// target but its descriptor can never be located on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageKey {
    pub name: String,
    pub version: Option<String>,
}

impl PackageKey {
    /// Build a key, treating an empty version as "no version".
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        let version = version.into();
        Self {
            name: name.into(),
            version: if version.is_empty() { None } else { Some(version) },
        }
    }

    #[cfg(test)]
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    /// `name:version`, or just `name` for a bare reference.
    pub fn canonical(&self) -> String {
        match &self.version {
            Some(version) => format!("{}:{}", self.name, version),
            None => self.name.clone(),
        }
    }

    pub fn is_versioned(&self) -> bool {
        self.version.is_some()
    }
}

impl std::fmt::Display for PackageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}:{}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}

/// One `<dependency>` entry from a descriptor. Missing fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyRecord {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl DependencyRecord {
    #[cfg(test)]
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
        }
    }

    /// `group:artifact:version`, as shown in the direct-dependency listing.
    pub fn coordinates(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }

    /// Graph identity of this dependency; `None` when the artifact id is empty.
    pub fn key(&self) -> Option<PackageKey> {
        if self.artifact_id.is_empty() {
            None
        } else {
            Some(PackageKey::new(&self.artifact_id, &self.version))
        }
    }
}

/// Visitation state used by the depth-first load-order walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeStatus {
    #[default]
    Unvisited,
    InProgress,
    Done,
}

/// How the repository argument is meant to be used.
///
/// Both modes read the same on-disk layout; the value is validated and echoed
/// in the parameter summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RepoWorkMode {
    Test,
    Prod,
}

impl std::fmt::Display for RepoWorkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoWorkMode::Test => write!(f, "test"),
            RepoWorkMode::Prod => write!(f, "prod"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_forms() {
        assert_eq!(PackageKey::new("app", "1.0").canonical(), "app:1.0");
        assert_eq!(PackageKey::new("app", "").canonical(), "app");
        assert_eq!(PackageKey::bare("junit").to_string(), "junit");
    }

    #[test]
    fn test_versioned_and_bare_keys_differ() {
        assert_ne!(PackageKey::new("lib", "1.0"), PackageKey::bare("lib"));
        assert_eq!(PackageKey::new("lib", ""), PackageKey::bare("lib"));
    }

    #[test]
    fn test_record_without_artifact_has_no_key() {
        let record = DependencyRecord::new("org.example", "", "1.0");
        assert!(record.key().is_none());
        assert_eq!(record.coordinates(), "org.example::1.0");
    }
}
