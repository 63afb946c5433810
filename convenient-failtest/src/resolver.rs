//! Chooses the directory holding the test runner's suite reports.

use std::path::{Path, PathBuf};

use convenient_pom::Project;
use tracing::{debug, warn};

use crate::{FailTestConfig, ReportLocationError};

/// Resolves the report directory from plugin configuration, falling back to
/// the conventional subdirectory of the output root.
#[derive(Debug, Clone)]
pub struct ReportLocationResolver {
    runner_artifact_id: String,
    reports_directory_key: String,
    reports_subdir: String,
}

impl ReportLocationResolver {
    /// Resolver using the runner, key and default subdirectory from `config`.
    pub fn new(config: &FailTestConfig) -> Self {
        Self {
            runner_artifact_id: config.runner_artifact_id.clone(),
            reports_directory_key: config.reports_directory_key.clone(),
            reports_subdir: config.reports_subdir.clone(),
        }
    }

    /// The report directory for `root`. Never fails: an unusable override is
    /// logged and the default is used instead.
    pub fn resolve(&self, root: &Path, project: &Project) -> PathBuf {
        match self.configured(project) {
            Ok(Some(location)) => {
                debug!("Using configured report directory {}", location.display());
                location
            }
            Ok(None) => self.default_location(root),
            Err(e) => {
                let fallback = self.default_location(root);
                warn!(
                    "Ignoring {} of {}: {}; using {}",
                    self.reports_directory_key,
                    self.runner_artifact_id,
                    e,
                    fallback.display()
                );
                fallback
            }
        }
    }

    /// `<root>/<reports_subdir>`
    pub fn default_location(&self, root: &Path) -> PathBuf {
        root.join(&self.reports_subdir)
    }

    /// The override from the first runner entry that has one, searching build
    /// plugins before plugin management.
    pub fn configured(&self, project: &Project) -> Result<Option<PathBuf>, ReportLocationError> {
        for plugin in project
            .combined_plugins()
            .filter(|plugin| plugin.artifact_id == self.runner_artifact_id)
        {
            if let Some(value) = plugin.configuration_value(&self.reports_directory_key)? {
                return Ok(Some(project.resolve_path(value)?));
            }
        }
        Ok(None)
    }
}
