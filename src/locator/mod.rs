//! Backup locator
//!
//! Finds the best backup candidate for a target file with a deterministic
//! two-phase search that stops at the first match:
//!
//! 1. **Same directory, same name**: `<dir>/<file name><ext>` for each
//!    configured extension, in order. The extension is appended, so
//!    `notes.txt` is probed as `notes.txt.bak`, never `notes.bak`.
//! 2. **Ancestor fallback**: starting with the target's own directory and
//!    walking upward at most `max_ancestor_levels` directories, the
//!    immediate children of each directory are listed and the first file
//!    whose extension is recognized wins, whatever its base name. Ties
//!    inside one directory are broken by file name in byte order.
//!
//! The search is read-only. A failed stat or directory listing counts as
//! "nothing there" and the walk moves on; not finding anything is a normal
//! outcome, never an error.
//!
//! # Example
//!
//! ```rust,ignore
//! use bakr::locator::BackupLocator;
//!
//! let locator = BackupLocator::default();
//! if let Some(backup) = locator.locate(Path::new("/data/notes.txt")) {
//!     println!("restore from {}", backup.display());
//! }
//! ```

mod plan;

pub use plan::{AncestorProbe, ProbedPath, SearchPlan};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::settings::{SearchSettings, DEFAULT_EXTENSIONS, DEFAULT_MAX_ANCESTOR_LEVELS};

/// Finds backup candidates for target files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupLocator {
    /// Recognized extensions with a leading dot, in priority order
    extensions: Vec<String>,
    /// Directories examined by the ancestor fallback
    max_ancestor_levels: usize,
}

impl Default for BackupLocator {
    fn default() -> Self {
        Self::new(
            DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_MAX_ANCESTOR_LEVELS,
        )
    }
}

impl BackupLocator {
    /// Create a locator; extensions without a leading dot get one
    pub fn new(extensions: Vec<String>, max_ancestor_levels: usize) -> Self {
        let extensions = extensions
            .into_iter()
            .filter(|ext| !ext.is_empty())
            .map(|ext| {
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{}", ext)
                }
            })
            .collect();

        Self {
            extensions,
            max_ancestor_levels,
        }
    }

    /// Create a locator from search settings
    pub fn from_settings(settings: &SearchSettings) -> Self {
        Self::new(settings.extensions.clone(), settings.max_ancestor_levels)
    }

    /// Recognized extensions
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Ancestor level budget
    pub fn max_ancestor_levels(&self) -> usize {
        self.max_ancestor_levels
    }

    /// Find the best backup for `target`, if any
    pub fn locate(&self, target: &Path) -> Option<PathBuf> {
        if let Some(found) = self.same_directory_probes(target).find(|p| p.is_file()) {
            debug!(file = %target.display(), backup = %found.display(), "Same-name backup found");
            return Some(found);
        }

        for (level, dir) in self.ancestors(target) {
            if let Some(found) = self.matches_in(dir, target).into_iter().next() {
                debug!(
                    file = %target.display(),
                    backup = %found.display(),
                    level,
                    "Ancestor backup found"
                );
                return Some(found);
            }
        }

        debug!(file = %target.display(), "No backup found");
        None
    }

    /// Describe the probes `locate` makes for `target`, in order, stopping
    /// where it stops
    pub fn search_plan(&self, target: &Path) -> SearchPlan {
        let mut same_directory = Vec::new();
        for path in self.same_directory_probes(target) {
            let exists = path.is_file();
            same_directory.push(ProbedPath { path, exists });
            if exists {
                break;
            }
        }

        let mut ancestors = Vec::new();
        if !same_directory.last().is_some_and(|p: &ProbedPath| p.exists) {
            for (level, dir) in self.ancestors(target) {
                let matches = self.matches_in(dir, target);
                let found = !matches.is_empty();
                ancestors.push(AncestorProbe {
                    level,
                    directory: dir.to_path_buf(),
                    matches,
                });
                if found {
                    break;
                }
            }
        }

        SearchPlan {
            target: target.to_path_buf(),
            same_directory,
            ancestors,
        }
    }

    /// Phase 1 candidate paths, in extension order
    fn same_directory_probes<'a>(&'a self, target: &'a Path) -> impl Iterator<Item = PathBuf> + 'a {
        let dir = parent_dir(target);
        let name = target.file_name().map(|n| n.to_os_string());

        self.extensions.iter().filter_map(move |ext| {
            let mut probe = name.clone()?;
            probe.push(ext);
            Some(dir.join(probe))
        })
    }

    /// Phase 2 directories as `(level, dir)`, level 1 being the target's
    /// own directory; stops at the filesystem root
    fn ancestors<'a>(&self, target: &'a Path) -> impl Iterator<Item = (usize, &'a Path)> {
        parent_dir(target)
            .ancestors()
            .filter(|dir| !dir.as_os_str().is_empty())
            .take(self.max_ancestor_levels)
            .enumerate()
            .map(|(i, dir)| (i + 1, dir))
    }

    /// Recognized-extension files directly inside `dir`, sorted by name,
    /// excluding the target itself
    fn matches_in(&self, dir: &Path, target: &Path) -> Vec<PathBuf> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
                return Vec::new();
            }
        };

        let mut matches: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.as_path() != target && self.is_recognized(path) && path.is_file())
            .collect();

        matches.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        matches
    }

    fn is_recognized(&self, path: &Path) -> bool {
        path.extension().map_or(false, |ext| {
            let ext = ext.to_string_lossy();
            self.extensions
                .iter()
                .any(|known| known.strip_prefix('.') == Some(ext.as_ref()))
        })
    }
}

/// Find a backup with an explicit policy
pub fn locate(target: &Path, extensions: &[String], max_ancestor_levels: usize) -> Option<PathBuf> {
    BackupLocator::new(extensions.to_vec(), max_ancestor_levels).locate(target)
}

fn parent_dir(target: &Path) -> &Path {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn test_same_directory_match() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a/b/file.txt");
        touch(&target);
        touch(&temp.path().join("a/b/file.txt.bak"));
        touch(&temp.path().join("a/other.bak"));

        let found = BackupLocator::default().locate(&target);
        assert_eq!(found, Some(temp.path().join("a/b/file.txt.bak")));
    }

    #[test]
    fn test_extension_order_wins() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("file.txt");
        touch(&target);
        touch(&temp.path().join("file.txt.old"));
        touch(&temp.path().join("file.txt.backup"));

        let found = BackupLocator::default().locate(&target);
        assert_eq!(found, Some(temp.path().join("file.txt.backup")));
    }

    #[test]
    fn test_suffix_is_appended_not_replaced() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("d/file.txt");
        touch(&target);
        touch(&temp.path().join("d/sub/keep.txt"));
        // file.bak is not a same-name match, but the ancestor phase accepts it
        touch(&temp.path().join("d/file.bak"));

        let plan = BackupLocator::default().search_plan(&target);
        assert!(plan.same_directory.iter().all(|p| !p.exists));
        assert_eq!(plan.same_directory[0].path, temp.path().join("d/file.txt.bak"));
        assert_eq!(
            BackupLocator::default().locate(&target),
            Some(temp.path().join("d/file.bak"))
        );
    }

    #[test]
    fn test_ancestor_fallback() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a/b/c/file.txt");
        touch(&target);
        touch(&temp.path().join("a/old.backup"));

        let found = BackupLocator::default().locate(&target);
        assert_eq!(found, Some(temp.path().join("a/old.backup")));
    }

    #[test]
    fn test_nearest_ancestor_wins() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a/b/c/file.txt");
        touch(&target);
        touch(&temp.path().join("a/far.bak"));
        touch(&temp.path().join("a/b/near.old"));

        let found = BackupLocator::default().locate(&target);
        assert_eq!(found, Some(temp.path().join("a/b/near.old")));
    }

    #[test]
    fn test_lexicographic_tie_break() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a/b/file.txt");
        touch(&target);
        touch(&temp.path().join("a/zeta.bak"));
        touch(&temp.path().join("a/alpha.old"));
        touch(&temp.path().join("a/mid.backup"));

        let found = BackupLocator::default().locate(&target);
        assert_eq!(found, Some(temp.path().join("a/alpha.old")));
    }

    #[test]
    fn test_level_budget_respected() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a/b/c/file.txt");
        touch(&target);
        touch(&temp.path().join("a/old.bak"));

        // c, b: two levels do not reach a
        let locator = BackupLocator::new(vec![".bak".into()], 2);
        assert_eq!(locator.locate(&target), None);

        let locator = BackupLocator::new(vec![".bak".into()], 3);
        assert_eq!(locator.locate(&target), Some(temp.path().join("a/old.bak")));
    }

    #[test]
    fn test_directories_are_not_candidates() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a/file.txt");
        touch(&target);
        fs::create_dir_all(temp.path().join("a/file.txt.bak")).unwrap();
        fs::create_dir_all(temp.path().join("a/cache.old")).unwrap();

        let locator = BackupLocator::new(vec![".bak".into(), ".old".into()], 1);
        assert_eq!(locator.locate(&target), None);
    }

    #[test]
    fn test_target_is_not_its_own_backup() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a/settings.bak");
        touch(&target);

        let locator = BackupLocator::new(vec![".bak".into()], 1);
        assert_eq!(locator.locate(&target), None);
    }

    #[test]
    fn test_not_found_never_panics_on_missing_dirs() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("does/not/exist/file.txt");

        let locator = BackupLocator::new(vec![".nomatch-ext".into()], 10);
        assert_eq!(locator.locate(&target), None);
    }

    #[test]
    fn test_extensions_normalized() {
        let locator = BackupLocator::new(vec!["bak".into(), ".old".into(), String::new()], 1);
        assert_eq!(locator.extensions(), &[".bak".to_string(), ".old".to_string()]);
    }

    #[test]
    fn test_free_function_matches_locator() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("x/file.txt");
        touch(&target);
        touch(&temp.path().join("x/file.txt.orig"));

        let found = locate(&target, &[".orig".to_string()], 5);
        assert_eq!(found, Some(temp.path().join("x/file.txt.orig")));
    }
}
