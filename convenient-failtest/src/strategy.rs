//! Failed-test strategies and their selection.

use serde::Serialize;
use std::path::PathBuf;

use convenient_pom::Plugin;
use tracing::{debug, info};

use crate::{BuildContext, FailTestConfig, MarkerStore, ReportLocationResolver, ReportScanner, Result};

/// What one `apply()` found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Detection {
    /// Directory that was scanned, `None` when detection did not run.
    pub report_directory: Option<PathBuf>,
    /// Suites with errors in the current reports.
    pub failed_suites: usize,
    /// Whether the previous run left a marker.
    pub had_mark: bool,
}

impl Detection {
    /// Current failures, or failures recorded by the previous run.
    pub fn has_failed_tests(&self) -> bool {
        self.had_mark || self.failed_suites > 0
    }
}

/// Detection against Surefire-style plain-text reports.
#[derive(Debug, Clone)]
pub struct SurefireStrategy {
    config: FailTestConfig,
    initial_skip_tests: Option<String>,
    resolver: ReportLocationResolver,
    scanner: ReportScanner,
    marker: MarkerStore,
}

impl SurefireStrategy {
    /// Strategy restoring `skipTests` to `initial_skip_tests` when failures are found.
    pub fn new(config: FailTestConfig, initial_skip_tests: Option<String>) -> Self {
        Self {
            resolver: ReportLocationResolver::new(&config),
            scanner: ReportScanner::new(&config),
            marker: MarkerStore::new(&config),
            initial_skip_tests,
            config,
        }
    }

    /// The `skipTests` value captured before the build touched it.
    pub fn initial_skip_tests(&self) -> Option<&str> {
        self.initial_skip_tests.as_deref()
    }

    /// Scan the reports, rewrite the marker, and restore `skipTests` on the
    /// context when this or the previous run had failures.
    ///
    /// The marker always ends up reflecting the current scan only, while the
    /// returned decision also honours the marker left by the previous call.
    pub fn apply(&self, ctx: &mut BuildContext) -> Result<Detection> {
        let root = ctx.output_root(&self.config)?;
        let report_directory = self.resolver.resolve(&root, ctx.project());
        let failed_suites = self.scanner.count_failed(&report_directory);

        let had_mark = self.marker.has_mark(&root);
        self.marker.set_mark(&root, failed_suites > 0);

        let detection = Detection {
            report_directory: Some(report_directory),
            failed_suites,
            had_mark,
        };
        if !detection.has_failed_tests() {
            debug!("No failed tests under {}", root.display());
            return Ok(detection);
        }

        info!(
            "Tests with errors: {} .. force cleaning on failing tests",
            failed_suites
        );
        ctx.restore_property(
            &self.config.skip_tests_property,
            self.initial_skip_tests.as_deref(),
        );
        Ok(detection)
    }
}

/// The strategy chosen for one output root.
#[derive(Debug, Clone)]
pub enum FailedTestStrategy {
    /// Detection does not apply.
    NoOp,
    /// Surefire report detection.
    Surefire(SurefireStrategy),
}

impl FailedTestStrategy {
    /// Pick a strategy from the initial skip-tests value and the build plugins.
    ///
    /// Globally skipped tests leave nothing to detect; without the test-runner
    /// plugin there are no reports to interpret.
    pub fn select(
        config: FailTestConfig,
        initial_skip_tests: Option<&str>,
        plugins: &[Plugin],
    ) -> Self {
        if initial_skip_tests == Some("true") {
            debug!("Tests are skipped, failed-test detection disabled");
            return Self::NoOp;
        }
        if plugins.iter().any(|p| p.artifact_id == config.runner_artifact_id) {
            debug!("Found {}, using report detection", config.runner_artifact_id);
            return Self::Surefire(SurefireStrategy::new(
                config,
                initial_skip_tests.map(str::to_string),
            ));
        }
        debug!("No test runner plugin configured, failed-test detection disabled");
        Self::NoOp
    }

    /// Select for `ctx`, capturing its current skip-tests property as the initial value.
    pub fn for_context(config: FailTestConfig, ctx: &BuildContext) -> Self {
        let initial_skip_tests = ctx.property(&config.skip_tests_property).map(str::to_string);
        Self::select(config, initial_skip_tests.as_deref(), &ctx.project().plugins)
    }

    /// Run the strategy once.
    pub fn apply(&self, ctx: &mut BuildContext) -> Result<Detection> {
        match self {
            Self::NoOp => Ok(Detection::default()),
            Self::Surefire(strategy) => strategy.apply(ctx),
        }
    }

    /// True for [`FailedTestStrategy::NoOp`].
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }
}
