//! Sentinel file remembering that the previous run had failing tests.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::FailTestConfig;

/// Presence/absence of a zero-byte marker file below an output root.
#[derive(Debug, Clone)]
pub struct MarkerStore {
    file_name: String,
}

impl MarkerStore {
    /// Store using the marker name from `config`.
    pub fn new(config: &FailTestConfig) -> Self {
        Self {
            file_name: config.marker_name.clone(),
        }
    }

    /// Location of the marker below `root`.
    pub fn path(&self, root: &Path) -> PathBuf {
        root.join(&self.file_name)
    }

    /// True iff the marker exists below `root`.
    pub fn has_mark(&self, root: &Path) -> bool {
        self.path(root).exists()
    }

    /// Make the marker reflect `failed`.
    ///
    /// Any existing marker is deleted first and recreated only when `failed`.
    /// The two steps are not atomic; an interruption in between leaves no
    /// marker. I/O failures are logged, never returned.
    pub fn set_mark(&self, root: &Path, failed: bool) {
        let path = self.path(root);

        if path.exists()
            && let Err(e) = fs::remove_file(&path)
        {
            warn!("Failed to remove marker {}: {}", path.display(), e);
        }

        if failed && let Err(e) = File::create(&path) {
            warn!("Failed to create marker {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn set_mark_writes_the_given_state() {
        let temp = TempDir::new().unwrap();
        let store = MarkerStore::new(&FailTestConfig::default());
        assert!(!store.has_mark(temp.path()));

        store.set_mark(temp.path(), true);
        assert!(store.has_mark(temp.path()));
        assert_eq!(fs::metadata(store.path(temp.path())).unwrap().len(), 0);

        store.set_mark(temp.path(), true);
        assert!(store.has_mark(temp.path()));

        store.set_mark(temp.path(), false);
        assert!(!store.has_mark(temp.path()));

        store.set_mark(temp.path(), false);
        assert!(!store.has_mark(temp.path()));
    }

    #[test]
    fn marker_lives_directly_under_root() {
        let store = MarkerStore::new(&FailTestConfig::default());
        assert_eq!(
            store.path(Path::new("/work/app/target")),
            PathBuf::from("/work/app/target/failtest.mark")
        );
    }

    #[test]
    fn recreated_marker_is_emptied() {
        let temp = TempDir::new().unwrap();
        let store = MarkerStore::new(&FailTestConfig::default());
        fs::write(store.path(temp.path()), "stale").unwrap();

        store.set_mark(temp.path(), true);
        assert_eq!(fs::read(store.path(temp.path())).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn missing_root_is_not_fatal() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("absent");
        let store = MarkerStore::new(&FailTestConfig::default());

        store.set_mark(&root, true);
        assert!(!store.has_mark(&root));
    }
}
