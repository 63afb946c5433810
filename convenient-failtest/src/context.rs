//! Per-module build state shared between the build pipeline and the strategies.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use convenient_pom::Project;
use tracing::debug;

use crate::{FailTestConfig, FailTestError, Result};

/// The build session view of one module: its descriptor, compiled-output
/// directory, and the mutable property set later build steps read.
#[derive(Debug, Clone)]
pub struct BuildContext {
    project: Project,
    output_directory: PathBuf,
    properties: BTreeMap<String, String>,
}

impl BuildContext {
    /// Start a session for `project`, seeding properties from its `<properties>`.
    pub fn new(project: Project) -> Self {
        Self {
            output_directory: project.output_directory.clone(),
            properties: project.properties.clone(),
            project,
        }
    }

    /// Load the descriptor at `pom` and start a session for it.
    pub fn load(pom: &Path) -> Result<Self> {
        Ok(Self::new(Project::load(pom)?))
    }

    /// Override the compiled-output directory reported by the descriptor.
    #[must_use]
    pub fn with_output_directory(mut self, output_directory: impl Into<PathBuf>) -> Self {
        self.output_directory = output_directory.into();
        self
    }

    /// The module's build descriptor.
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Directory compiled classes are written to.
    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// The build output root: parent of the output directory, which must carry
    /// the conventional name.
    pub fn output_root(&self, config: &FailTestConfig) -> Result<PathBuf> {
        let root = self
            .output_directory
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .ok_or_else(|| FailTestError::NoOutputRoot(self.output_directory.clone()))?;

        if root.file_name().and_then(|name| name.to_str()) != Some(config.output_root_name.as_str()) {
            return Err(FailTestError::NotAnOutputRoot {
                path: root.to_path_buf(),
                expected: config.output_root_name.clone(),
            });
        }
        Ok(root.to_path_buf())
    }

    /// Current value of a build property.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Set a build property, returning the previous value.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.properties.insert(key.into(), value.into())
    }

    /// Put a property back to a captured value; `None` removes it.
    pub fn restore_property(&mut self, key: &str, value: Option<&str>) {
        debug!("Restoring property {} to {:?}", key, value);
        let _previous = match value {
            Some(value) => self.properties.insert(key.to_string(), value.to_string()),
            None => self.properties.remove(key),
        };
    }
}
