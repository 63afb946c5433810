//! Minimal reader for Maven build descriptors (`pom.xml`).
//!
//! Only what incremental-build tooling needs is extracted: the build and
//! output directories, `<properties>`, and the build plugins together with
//! their plugin-management defaults. Plugin configuration stays an untyped
//! [`XmlNode`] tree so arbitrary plugin settings can be queried by name.
//!
//! ```
//! use convenient_pom::Project;
//!
//! let xml = r#"<project>
//!   <build><plugins><plugin>
//!     <artifactId>maven-surefire-plugin</artifactId>
//!     <configuration><reportsDirectory>${project.build.directory}/reports</reportsDirectory></configuration>
//!   </plugin></plugins></build>
//! </project>"#;
//! let project = Project::parse(xml, "/work/app").unwrap();
//! let plugin = project.plugin("maven-surefire-plugin").unwrap();
//! let raw = plugin.configuration_value("reportsDirectory").unwrap().unwrap();
//! assert_eq!(project.interpolate(raw).unwrap(), "/work/app/target/reports");
//! ```

use std::path::PathBuf;

pub mod dom;
pub mod model;

pub use dom::XmlNode;
pub use model::{ConfigValueError, InterpolationError, Plugin, Project, DEFAULT_PLUGIN_GROUP_ID};

/// Errors raised while loading a build descriptor.
#[derive(Debug, thiserror::Error)]
pub enum PomError {
    /// The descriptor file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// The descriptor path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The XML reader rejected the document.
    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The document contains no element.
    #[error("Document has no root element")]
    MissingRoot,

    /// The document ended inside an element.
    #[error("Document ended with {0} unclosed element(s)")]
    UnexpectedEof(usize),

    /// An end tag appeared at the top level.
    #[error("End tag without a matching start tag")]
    UnbalancedEndTag,

    /// The root element is not `<project>`.
    #[error("Unexpected root element <{0}>, expected <project>")]
    NotAProject(String),

    /// `<directory>` or `<outputDirectory>` cannot be expanded.
    #[error("Cannot resolve build path: {0}")]
    Interpolation(#[from] InterpolationError),
}

/// Result type for descriptor loading.
pub type Result<T> = std::result::Result<T, PomError>;
