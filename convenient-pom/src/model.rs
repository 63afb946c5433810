//! Typed view over the parts of a build descriptor that tooling reads.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{PomError, Result, XmlNode};

/// Group id assumed for plugins that do not declare one.
pub const DEFAULT_PLUGIN_GROUP_ID: &str = "org.apache.maven.plugins";

/// Nesting limit for properties that reference other properties.
const MAX_INTERPOLATION_DEPTH: usize = 16;

/// A configuration entry exists but cannot be used as a plain value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigValueError {
    /// The element has neither text nor children.
    #[error("<{0}> is empty")]
    Empty(String),

    /// The element has child elements.
    #[error("<{0}> holds nested elements instead of a value")]
    NotAValue(String),
}

/// A `${...}` expression that cannot be expanded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterpolationError {
    /// Neither the project model nor `<properties>` defines the key.
    #[error("Unknown property '{0}'")]
    UnknownProperty(String),

    /// `${` without a closing `}`.
    #[error("Unterminated expression in '{0}'")]
    Unterminated(String),

    /// Properties reference each other too deeply or in a cycle.
    #[error("Property '{0}' references itself or nests too deeply")]
    Recursive(String),
}

/// A `<plugin>` entry of the build or of plugin management.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plugin {
    /// `<groupId>`, defaulting to [`DEFAULT_PLUGIN_GROUP_ID`].
    pub group_id: String,
    /// `<artifactId>`
    pub artifact_id: String,
    /// `<version>`, if pinned.
    pub version: Option<String>,
    /// The `<configuration>` element, if any.
    pub configuration: Option<XmlNode>,
}

impl Plugin {
    /// A plugin in the default group without version or configuration.
    pub fn new(artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: DEFAULT_PLUGIN_GROUP_ID.to_string(),
            artifact_id: artifact_id.into(),
            version: None,
            configuration: None,
        }
    }

    /// Attach a `<configuration>` tree.
    pub fn with_configuration(mut self, configuration: XmlNode) -> Self {
        self.configuration = Some(configuration);
        self
    }

    fn from_node(node: &XmlNode) -> Option<Self> {
        let Some(artifact_id) = node.child_value("artifactId") else {
            debug!("Skipping plugin entry without artifactId");
            return None;
        };
        Some(Self {
            group_id: node
                .child_value("groupId")
                .unwrap_or(DEFAULT_PLUGIN_GROUP_ID)
                .to_string(),
            artifact_id: artifact_id.to_string(),
            version: node.child_value("version").map(str::to_string),
            configuration: node.child("configuration").cloned(),
        })
    }

    /// Look up a scalar value in the plugin configuration.
    ///
    /// Returns `Ok(None)` when the plugin has no such entry and an error when
    /// the entry exists but is empty or is a nested structure.
    pub fn configuration_value(&self, name: &str) -> std::result::Result<Option<&str>, ConfigValueError> {
        let Some(entry) = self.configuration.as_ref().and_then(|c| c.child(name)) else {
            return Ok(None);
        };
        if !entry.children.is_empty() {
            return Err(ConfigValueError::NotAValue(name.to_string()));
        }
        match entry.value.as_deref() {
            Some(value) => Ok(Some(value)),
            None => Err(ConfigValueError::Empty(name.to_string())),
        }
    }
}

/// The module described by one build descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// `<artifactId>`
    pub artifact_id: Option<String>,
    /// Directory containing the descriptor.
    pub basedir: PathBuf,
    /// `project.build.directory`, usually `<basedir>/target`.
    pub build_directory: PathBuf,
    /// `project.build.outputDirectory`, usually `<build_directory>/classes`.
    pub output_directory: PathBuf,
    /// `<properties>`, unexpanded.
    pub properties: BTreeMap<String, String>,
    /// `<build><plugins>`
    pub plugins: Vec<Plugin>,
    /// `<build><pluginManagement><plugins>`
    pub plugin_management: Vec<Plugin>,
}

impl Project {
    /// A project without plugins or properties rooted at `basedir`.
    pub fn new(basedir: impl Into<PathBuf>) -> Self {
        let basedir = basedir.into();
        let build_directory = basedir.join("target");
        Self {
            artifact_id: None,
            output_directory: build_directory.join("classes"),
            build_directory,
            basedir,
            properties: BTreeMap::new(),
            plugins: Vec::new(),
            plugin_management: Vec::new(),
        }
    }

    /// Read and parse the descriptor at `path`; its parent becomes the basedir.
    pub fn load(path: &Path) -> Result<Self> {
        let xml = fs::read_to_string(path).map_err(|source| PomError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let basedir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        debug!("Loading build descriptor {}", path.display());
        Self::parse(&xml, basedir)
    }

    /// Parse descriptor text; relative build paths are anchored at `basedir`.
    pub fn parse(xml: &str, basedir: impl Into<PathBuf>) -> Result<Self> {
        Self::from_node(&XmlNode::parse(xml)?, basedir)
    }

    /// Build the model from an already parsed `<project>` element.
    pub fn from_node(root: &XmlNode, basedir: impl Into<PathBuf>) -> Result<Self> {
        if root.name != "project" {
            return Err(PomError::NotAProject(root.name.clone()));
        }

        let mut project = Self::new(basedir);
        project.artifact_id = root.child_value("artifactId").map(str::to_string);
        if let Some(properties) = root.child("properties") {
            project.properties = properties
                .children
                .iter()
                .map(|p| (p.name.clone(), p.value.clone().unwrap_or_default()))
                .collect();
        }

        let build = root.child("build");
        project.plugins = plugins_at(build, &["plugins"]);
        project.plugin_management = plugins_at(build, &["pluginManagement", "plugins"]);

        if let Some(directory) = build.and_then(|b| b.child_value("directory")) {
            project.build_directory = project.resolve_path(directory)?;
            project.output_directory = project.build_directory.join("classes");
        }
        if let Some(directory) = build.and_then(|b| b.child_value("outputDirectory")) {
            project.output_directory = project.resolve_path(directory)?;
        }

        Ok(project)
    }

    /// First build plugin with the given artifact id.
    pub fn plugin(&self, artifact_id: &str) -> Option<&Plugin> {
        self.plugins.iter().find(|p| p.artifact_id == artifact_id)
    }

    /// Whether a build plugin with the given artifact id is configured.
    pub fn has_plugin(&self, artifact_id: &str) -> bool {
        self.plugin(artifact_id).is_some()
    }

    /// Build plugins followed by plugin-management entries, which act as defaults.
    pub fn combined_plugins(&self) -> impl Iterator<Item = &Plugin> {
        self.plugins.iter().chain(self.plugin_management.iter())
    }

    /// Expand `${...}` expressions against the project model and `<properties>`.
    ///
    /// Property values are expanded in turn, so `${a}` with `a` set to
    /// `${project.build.directory}/x` resolves fully.
    pub fn interpolate(&self, value: &str) -> std::result::Result<String, InterpolationError> {
        self.interpolate_nested(value, 0)
    }

    fn interpolate_nested(
        &self,
        value: &str,
        depth: usize,
    ) -> std::result::Result<String, InterpolationError> {
        let mut expanded = String::with_capacity(value.len());
        let mut rest = value;
        while let Some(start) = rest.find("${") {
            expanded.push_str(&rest[..start]);
            let expression = &rest[start + 2..];
            let end = expression
                .find('}')
                .ok_or_else(|| InterpolationError::Unterminated(value.to_string()))?;
            let key = &expression[..end];
            let resolved = self
                .lookup(key)
                .ok_or_else(|| InterpolationError::UnknownProperty(key.to_string()))?;
            if resolved.contains("${") {
                if depth >= MAX_INTERPOLATION_DEPTH {
                    return Err(InterpolationError::Recursive(key.to_string()));
                }
                expanded.push_str(&self.interpolate_nested(&resolved, depth + 1)?);
            } else {
                expanded.push_str(&resolved);
            }
            rest = &expression[end + 1..];
        }
        expanded.push_str(rest);
        Ok(expanded)
    }

    /// Interpolate `value` and anchor it at the basedir when relative.
    pub fn resolve_path(&self, value: &str) -> std::result::Result<PathBuf, InterpolationError> {
        let path = PathBuf::from(self.interpolate(value)?);
        if path.is_absolute() {
            Ok(path)
        } else {
            Ok(self.basedir.join(path))
        }
    }

    fn lookup(&self, key: &str) -> Option<String> {
        match key {
            "project.build.directory" => Some(self.build_directory.display().to_string()),
            "project.build.outputDirectory" => Some(self.output_directory.display().to_string()),
            "basedir" | "project.basedir" => Some(self.basedir.display().to_string()),
            "project.artifactId" => self.artifact_id.clone(),
            _ => self.properties.get(key).cloned(),
        }
    }
}

fn plugins_at(build: Option<&XmlNode>, path: &[&str]) -> Vec<Plugin> {
    build
        .and_then(|b| b.descend(path))
        .map(|plugins| plugins.children_named("plugin").filter_map(Plugin::from_node).collect())
        .unwrap_or_default()
}
