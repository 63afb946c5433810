//! Naming conventions shared by the detection components.

/// Conventions of the host build tool and its test runner.
///
/// The defaults describe Maven with the Surefire plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailTestConfig {
    /// Required file name of the build output root.
    pub output_root_name: String,
    /// Report directory below the output root when none is configured.
    pub reports_subdir: String,
    /// File-name suffix of per-suite report files.
    pub report_suffix: String,
    /// Number of leading lines inspected in each report.
    pub line_budget: usize,
    /// Bytes kept per inspected line; the rest of a longer line is skipped.
    pub line_byte_limit: u64,
    /// Sentinel file recording failures of the previous run.
    pub marker_name: String,
    /// Artifact id identifying the test-runner plugin.
    pub runner_artifact_id: String,
    /// Plugin configuration entry overriding the report directory.
    pub reports_directory_key: String,
    /// Build property holding the skip-tests setting.
    pub skip_tests_property: String,
}

impl Default for FailTestConfig {
    fn default() -> Self {
        Self {
            output_root_name: "target".to_string(),
            reports_subdir: "surefire-reports".to_string(),
            report_suffix: "Test.txt".to_string(),
            line_budget: 5,
            line_byte_limit: 4096,
            marker_name: "failtest.mark".to_string(),
            runner_artifact_id: "maven-surefire-plugin".to_string(),
            reports_directory_key: "reportsDirectory".to_string(),
            skip_tests_property: "skipTests".to_string(),
        }
    }
}
