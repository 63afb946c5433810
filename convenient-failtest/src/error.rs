//! Error types for failed-test detection.

use std::path::PathBuf;

use convenient_pom::{ConfigValueError, InterpolationError, PomError};

/// Errors that abort detection.
///
/// Everything else (missing reports, unreadable files, bad configuration) is
/// absorbed by the components and only logged.
#[derive(Debug, thiserror::Error)]
pub enum FailTestError {
    /// The output directory has no parent to act as output root.
    #[error("Output directory {} has no parent directory", .0.display())]
    NoOutputRoot(PathBuf),

    /// The output root is not named after the build tool convention.
    #[error("{} is not a build output root (expected a directory named '{expected}')", .path.display())]
    NotAnOutputRoot {
        /// The offending directory.
        path: PathBuf,
        /// The conventional name.
        expected: String,
    },

    /// The build descriptor could not be loaded.
    #[error(transparent)]
    Pom(#[from] PomError),
}

/// Result type for detection operations.
pub type Result<T> = std::result::Result<T, FailTestError>;

/// A configured report directory that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportLocationError {
    /// The configuration entry has the wrong shape.
    #[error(transparent)]
    Config(#[from] ConfigValueError),

    /// The configured value references unknown properties.
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
}
