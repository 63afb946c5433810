//! Heuristic classification of plain-text suite reports.
//!
//! The summary line (`Tests run: 3, Failures: 0, Errors: 1, ...`) sits at the
//! top of each report, so only a fixed number of leading lines, each capped
//! at a fixed number of bytes, is read no matter how large the report is.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::FailTestConfig;

const ERRORS_MARKER: &str = "Errors: ";
const NO_ERRORS: &str = "Errors: 0";

/// True if a report line announces a nonzero error count.
pub fn line_reports_errors(line: &str) -> bool {
    line.contains(ERRORS_MARKER) && !line.contains(NO_ERRORS)
}

/// Scans a report directory for failed suites.
#[derive(Debug, Clone)]
pub struct ReportScanner {
    suffix: String,
    line_budget: usize,
    line_byte_limit: u64,
}

impl ReportScanner {
    /// Scanner using the suffix and read limits from `config`.
    pub fn new(config: &FailTestConfig) -> Self {
        Self {
            suffix: config.report_suffix.clone(),
            line_budget: config.line_budget,
            line_byte_limit: config.line_byte_limit,
        }
    }

    /// Report files directly inside `dir`, sorted by path.
    ///
    /// A missing or unreadable directory has no candidates.
    pub fn candidates(&self, dir: &Path) -> Vec<PathBuf> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("No reports in {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut reports: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.ends_with(self.suffix.as_str()))
            })
            .filter(|path| path.is_file())
            .collect();
        reports.sort();
        reports
    }

    /// Whether the report at `path` shows errors within the line budget.
    ///
    /// Only the first `line_byte_limit` bytes of each line are kept. Any read
    /// error or invalid UTF-8 makes the report count as passed.
    pub fn is_failed(&self, path: &Path) -> bool {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                debug!("Cannot open report {}: {}", path.display(), e);
                return false;
            }
        };

        let mut reader = BufReader::new(file);
        let mut line = Vec::new();
        for _ in 0..self.line_budget {
            match self.read_line(&mut reader, &mut line) {
                Ok(false) => return false,
                Ok(true) => {}
                Err(e) => {
                    debug!("Cannot read report {}: {}", path.display(), e);
                    return false;
                }
            }
            if line_reports_errors(&String::from_utf8_lossy(&line)) {
                return true;
            }
        }
        false
    }

    /// Read one line into `line`, capped at the byte limit. Returns `false` at
    /// end of file.
    fn read_line(&self, reader: &mut BufReader<File>, line: &mut Vec<u8>) -> io::Result<bool> {
        line.clear();
        let read = reader.by_ref().take(self.line_byte_limit).read_until(b'\n', line)?;
        if read == 0 {
            return Ok(false);
        }
        if line.last() != Some(&b'\n') && read as u64 == self.line_byte_limit {
            let _ = reader.skip_until(b'\n')?;
            return Ok(true);
        }
        if std::str::from_utf8(line).is_err() {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "report is not valid UTF-8"));
        }
        Ok(true)
    }

    /// Reports in `dir` classified as failed.
    pub fn failed_suites(&self, dir: &Path) -> Vec<PathBuf> {
        self.candidates(dir)
            .into_iter()
            .filter(|report| {
                let failed = self.is_failed(report);
                debug!("{}: {}", report.display(), if failed { "failed" } else { "ok" });
                failed
            })
            .collect()
    }

    /// Number of failed suites in `dir`.
    pub fn count_failed(&self, dir: &Path) -> usize {
        self.failed_suites(dir).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scanner() -> ReportScanner {
        ReportScanner::new(&FailTestConfig::default())
    }

    fn report(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, lines.join("\n")).unwrap();
        path
    }

    #[test]
    fn error_lines() {
        assert!(line_reports_errors("Tests run: 2, Errors: 1"));
        assert!(line_reports_errors("Errors: 12"));
        assert!(!line_reports_errors("Tests run: 3, Failures: 1, Errors: 0, Skipped: 0"));
        assert!(!line_reports_errors("Errors:1"));
        assert!(!line_reports_errors("no summary here"));
    }

    #[test]
    fn missing_directory_has_no_candidates() {
        let temp = TempDir::new().unwrap();
        assert!(scanner().candidates(&temp.path().join("absent")).is_empty());
        assert_eq!(scanner().count_failed(&temp.path().join("absent")), 0);
    }

    #[test]
    fn only_suite_reports_directly_inside_are_candidates() {
        let temp = TempDir::new().unwrap();
        let bar = report(temp.path(), "BarTest.txt", &["Errors: 1"]);
        let _ = report(temp.path(), "BarTest.xml", &["Errors: 1"]);
        let _ = report(temp.path(), "Summary.txt", &["Errors: 1"]);
        fs::create_dir(temp.path().join("nested")).unwrap();
        let _ = report(&temp.path().join("nested"), "DeepTest.txt", &["Errors: 1"]);
        fs::create_dir(temp.path().join("DirTest.txt")).unwrap();

        assert_eq!(scanner().candidates(temp.path()), vec![bar]);
    }

    #[test]
    fn errors_on_fifth_line_count() {
        let temp = TempDir::new().unwrap();
        let path = report(temp.path(), "EdgeTest.txt", &["1", "2", "3", "4", "Errors: 2"]);
        assert!(scanner().is_failed(&path));
    }

    #[test]
    fn errors_after_line_budget_are_ignored() {
        let temp = TempDir::new().unwrap();
        let path = report(temp.path(), "LateTest.txt", &["1", "2", "3", "4", "5", "Errors: 2"]);
        assert!(!scanner().is_failed(&path));
    }

    #[test]
    fn custom_line_budget() {
        let temp = TempDir::new().unwrap();
        let path = report(temp.path(), "LateTest.txt", &["1", "2", "3", "4", "5", "Errors: 2"]);
        let config = FailTestConfig {
            line_budget: 6,
            ..FailTestConfig::default()
        };
        assert!(ReportScanner::new(&config).is_failed(&path));
    }

    #[test]
    fn long_lines_are_capped() {
        let temp = TempDir::new().unwrap();
        let config = FailTestConfig {
            line_byte_limit: 16,
            ..FailTestConfig::default()
        };
        let scanner = ReportScanner::new(&config);

        let hidden = format!("{} Errors: 1", "x".repeat(64));
        let path = report(temp.path(), "HiddenTest.txt", &[&hidden]);
        assert!(!scanner.is_failed(&path));

        let path = report(temp.path(), "SecondTest.txt", &[&hidden, "Errors: 1"]);
        assert!(scanner.is_failed(&path));

        let path = report(temp.path(), "FifthTest.txt", &[&hidden, &hidden, &hidden, &hidden, "Errors: 1"]);
        assert!(scanner.is_failed(&path));

        let path = report(temp.path(), "SixthTest.txt", &[&hidden, &hidden, &hidden, &hidden, &hidden, "Errors: 1"]);
        assert!(!scanner.is_failed(&path));
    }

    #[test]
    fn report_without_newlines_is_read_in_bounds() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("FlatTest.txt");
        fs::write(&path, format!("Tests run: 2, Errors: 1{}", " ".repeat(1 << 20))).unwrap();
        assert!(scanner().is_failed(&path));
    }

    #[test]
    fn unreadable_report_counts_as_passed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("BinaryTest.txt");
        fs::write(&path, [0xff, 0xfe, b'\n', b'E', b'r', b'r']).unwrap();
        let failing = report(temp.path(), "RealTest.txt", &["Tests run: 1, Errors: 1"]);

        assert!(!scanner().is_failed(&path));
        assert_eq!(scanner().failed_suites(temp.path()), vec![failing]);
    }

    #[test]
    fn counts_each_failed_suite_once() {
        let temp = TempDir::new().unwrap();
        let _ = report(temp.path(), "ATest.txt", &["Errors: 1", "Errors: 3"]);
        let _ = report(temp.path(), "BTest.txt", &["Errors: 0"]);
        let _ = report(temp.path(), "CTest.txt", &["Tests run: 4, Errors: 4"]);
        assert_eq!(scanner().count_failed(temp.path()), 2);
    }
}
