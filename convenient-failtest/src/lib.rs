//! Failed-test detection for incremental builds.
//!
//! An incremental build skips tests when nothing changed, which would hide
//! failures left by the previous run. Before that decision is taken, this
//! crate looks at the test runner's plain-text suite reports under the build
//! output root, remembers failures in a marker file, and hands the original
//! `skipTests` value back to the build when failures exist so tests run again.
//!
//! # Components
//!
//! - [`ReportLocationResolver`]: configured `reportsDirectory` or
//!   `<root>/surefire-reports`
//! - [`ReportScanner`]: counts `*Test.txt` reports with `Errors: n` (n ≠ 0)
//!   in their first lines
//! - [`MarkerStore`]: `<root>/failtest.mark`
//! - [`FailedTestStrategy`]: selection plus the `apply()` orchestration
//!
//! # Example
//!
//! ```no_run
//! use convenient_failtest::{BuildContext, FailTestConfig, FailedTestStrategy};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ctx = BuildContext::load(Path::new("pom.xml"))?;
//! let strategy = FailedTestStrategy::for_context(FailTestConfig::default(), &ctx);
//!
//! // the incremental build suppresses tests...
//! let _ = ctx.set_property("skipTests", "true");
//!
//! // ...unless the previous run left failures behind
//! let detection = strategy.apply(&mut ctx)?;
//! if detection.has_failed_tests() {
//!     println!("skipTests is back to {:?}", ctx.property("skipTests"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod marker;
pub mod resolver;
pub mod scanner;
pub mod strategy;

pub use config::FailTestConfig;
pub use context::BuildContext;
pub use error::{FailTestError, ReportLocationError, Result};
pub use marker::MarkerStore;
pub use resolver::ReportLocationResolver;
pub use scanner::{ReportScanner, line_reports_errors};
pub use strategy::{Detection, FailedTestStrategy, SurefireStrategy};
