//! Recursive discovery of candidate source files.
//!
//! [`DirectoryWalker`] enumerates files under one or more root directories,
//! keeping only those whose extension matches the configured filter. Hidden
//! entries (dotfiles and dot-directories) are skipped. Symlinks are followed,
//! but never into a cycle: directories already visited by canonical path are
//! skipped with a warning instead of recursing forever.
//!
//! Two views of the same traversal are offered:
//! - [`DirectoryWalker::walk`] — a flattened, lexicographically sorted list
//!   of file paths, the form the resolver pipeline consumes;
//! - [`DirectoryWalker::walk_tree`] — a [`DirectoryWalkResult`] tree grouping
//!   files by directory, kept for diagnostics. Tree equality is set-based:
//!   filesystem enumeration order is not significant.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::{CalcDepsError, Result};

/// Recursive file discovery with an extension filter.
///
/// # Examples
///
/// ```rust,no_run
/// use calcdeps::walker::DirectoryWalker;
/// use std::path::PathBuf;
///
/// # fn example() -> calcdeps::core::Result<()> {
/// let walker = DirectoryWalker::new(["js"]);
/// let files = walker.walk(&[PathBuf::from("src"), PathBuf::from("vendor")])?;
/// for file in files {
///     println!("{}", file.display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryWalker {
    extensions: Vec<String>,
}

impl DirectoryWalker {
    /// Create a walker keeping files whose extension matches one of
    /// `extensions` (compared ASCII case-insensitively, without the dot).
    /// An empty filter keeps every file.
    #[must_use]
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    fn matches_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Enumerate matching files under every root.
    ///
    /// The result is deduplicated by canonical path and sorted
    /// lexicographically, so repeated runs over the same tree (and
    /// overlapping roots) yield identical lists.
    ///
    /// # Errors
    ///
    /// Returns [`CalcDepsError::DirectoryNotReadable`] when a directory under
    /// a root cannot be enumerated. Symlink loops are not errors; they are
    /// skipped with a warning.
    pub fn walk(&self, roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut found = BTreeSet::new();

        for root in roots {
            for entry in WalkDir::new(root)
                .follow_links(true)
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
            {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) if err.loop_ancestor().is_some() => {
                        let path = err
                            .path()
                            .map_or_else(String::new, |p| p.display().to_string());
                        warn!(path = %path, "skipping symlink loop");
                        continue;
                    }
                    Err(err) => {
                        let path = err
                            .path()
                            .map_or_else(|| root.display().to_string(), |p| p.display().to_string());
                        return Err(CalcDepsError::DirectoryNotReadable {
                            path,
                            reason: err.to_string(),
                        });
                    }
                };

                if !entry.file_type().is_file() || !self.matches_extension(entry.path()) {
                    continue;
                }
                // Canonical form both deduplicates overlapping roots and keeps
                // file identity stable for the resolver.
                let canonical = entry.path().canonicalize()?;
                found.insert(canonical);
            }
        }

        debug!(count = found.len(), "discovered source files");
        Ok(found.into_iter().collect())
    }

    /// Build the per-directory tree view of one root.
    ///
    /// # Errors
    ///
    /// Returns [`CalcDepsError::DirectoryNotReadable`] naming the offending
    /// path when a directory cannot be read.
    pub fn walk_tree(&self, root: &Path) -> Result<DirectoryWalkResult> {
        let mut visited = HashSet::new();
        // The visited set starts empty, so the root itself is never a repeat.
        Ok(self
            .walk_tree_inner(root, &mut visited)?
            .unwrap_or_else(|| DirectoryWalkResult::new(root.to_path_buf())))
    }

    fn walk_tree_inner(
        &self,
        dir: &Path,
        visited: &mut HashSet<PathBuf>,
    ) -> Result<Option<DirectoryWalkResult>> {
        let canonical = dir
            .canonicalize()
            .map_err(|err| not_readable(dir, &err))?;
        if !visited.insert(canonical) {
            warn!(path = %dir.display(), "skipping already-visited directory");
            return Ok(None);
        }

        let mut result = DirectoryWalkResult::new(dir.to_path_buf());
        let entries = std::fs::read_dir(dir).map_err(|err| not_readable(dir, &err))?;

        for entry in entries {
            let entry = entry.map_err(|err| not_readable(dir, &err))?;
            if is_hidden(&entry.file_name()) {
                continue;
            }
            let path = entry.path();
            if path.is_dir() {
                if let Some(child) = self.walk_tree_inner(&path, visited)? {
                    result.subdirectories.push(child);
                }
            } else if path.is_file() && self.matches_extension(&path) {
                result.files.insert(path);
            }
        }

        Ok(Some(result))
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

fn not_readable(path: &Path, err: &std::io::Error) -> CalcDepsError {
    CalcDepsError::DirectoryNotReadable {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// One directory's immediate file membership plus child directory results.
///
/// Equality is set-based: two results are equal iff they reference the same
/// directory, contain the same set of files, and the same set of recursively
/// equal subdirectory results. Enumeration order from the filesystem carries
/// no meaning.
#[derive(Debug, Clone)]
pub struct DirectoryWalkResult {
    /// The directory this result describes.
    pub directory: PathBuf,
    /// Matching files directly inside the directory.
    pub files: BTreeSet<PathBuf>,
    /// Results for child directories.
    pub subdirectories: Vec<DirectoryWalkResult>,
}

impl DirectoryWalkResult {
    /// Create an empty result for `directory`.
    #[must_use]
    pub fn new(directory: PathBuf) -> Self {
        Self {
            directory,
            files: BTreeSet::new(),
            subdirectories: Vec::new(),
        }
    }

    /// Flatten the tree into every contained file path, sorted.
    #[must_use]
    pub fn flatten(&self) -> Vec<PathBuf> {
        let mut all = BTreeSet::new();
        self.collect_into(&mut all);
        all.into_iter().collect()
    }

    fn collect_into(&self, out: &mut BTreeSet<PathBuf>) {
        out.extend(self.files.iter().cloned());
        for sub in &self.subdirectories {
            sub.collect_into(out);
        }
    }
}

impl PartialEq for DirectoryWalkResult {
    fn eq(&self, other: &Self) -> bool {
        if self.directory != other.directory
            || self.files != other.files
            || self.subdirectories.len() != other.subdirectories.len()
        {
            return false;
        }
        // Subdirectory results compare as a set; order of recursion into the
        // filesystem is not significant.
        self.subdirectories
            .iter()
            .all(|sub| other.subdirectories.contains(sub))
    }
}

impl Eq for DirectoryWalkResult {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, "// test file\n").unwrap();
    }

    fn fixture_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("sub")).unwrap();
        fs::create_dir(root.join(".hidden")).unwrap();
        touch(&root.join("a.js"));
        touch(&root.join("b.txt"));
        touch(&root.join(".secret.js"));
        touch(&root.join("sub/c.js"));
        touch(&root.join(".hidden/d.js"));
        temp
    }

    #[test]
    fn test_walk_filters_extension_and_hidden() {
        let temp = fixture_tree();
        let walker = DirectoryWalker::new(["js"]);
        let files = walker.walk(&[temp.path().to_path_buf()]).unwrap();

        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.js", "c.js"]);
    }

    #[test]
    fn test_walk_is_sorted_and_deduplicated() {
        let temp = fixture_tree();
        let walker = DirectoryWalker::new(["js"]);
        // Overlapping roots: the tree itself plus its subdirectory.
        let roots = vec![temp.path().to_path_buf(), temp.path().join("sub")];
        let files = walker.walk(&roots).unwrap();

        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_walk_empty_filter_keeps_everything() {
        let temp = fixture_tree();
        let walker = DirectoryWalker::new(Vec::<String>::new());
        let files = walker.walk(&[temp.path().to_path_buf()]).unwrap();
        assert_eq!(files.len(), 3); // a.js, b.txt, sub/c.js
    }

    #[test]
    fn test_walk_missing_root_errors() {
        let walker = DirectoryWalker::new(["js"]);
        let err = walker.walk(&[PathBuf::from("/no/such/root")]).unwrap_err();
        match err {
            CalcDepsError::DirectoryNotReadable { path, .. } => {
                assert!(path.contains("/no/such/root"));
            }
            other => panic!("expected DirectoryNotReadable, got {other:?}"),
        }
    }

    #[test]
    fn test_walk_tree_groups_by_directory() {
        let temp = fixture_tree();
        let walker = DirectoryWalker::new(["js"]);
        let tree = walker.walk_tree(temp.path()).unwrap();

        assert_eq!(tree.directory, temp.path());
        assert_eq!(tree.files.len(), 1);
        assert_eq!(tree.subdirectories.len(), 1);
        assert_eq!(tree.subdirectories[0].files.len(), 1);
        assert_eq!(tree.flatten().len(), 2);
    }

    #[test]
    fn test_walk_result_equality_is_set_based() {
        let mut left = DirectoryWalkResult::new(PathBuf::from("/root"));
        left.files.insert(PathBuf::from("/root/a.js"));
        left.subdirectories.push(DirectoryWalkResult::new(PathBuf::from("/root/x")));
        left.subdirectories.push(DirectoryWalkResult::new(PathBuf::from("/root/y")));

        let mut right = DirectoryWalkResult::new(PathBuf::from("/root"));
        right.files.insert(PathBuf::from("/root/a.js"));
        // Same subdirectories, opposite insertion order.
        right.subdirectories.push(DirectoryWalkResult::new(PathBuf::from("/root/y")));
        right.subdirectories.push(DirectoryWalkResult::new(PathBuf::from("/root/x")));

        assert_eq!(left, right);

        right.files.insert(PathBuf::from("/root/b.js"));
        assert_ne!(left, right);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_is_skipped() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("sub")).unwrap();
        touch(&root.join("sub/a.js"));
        // sub/loop points back at the root.
        std::os::unix::fs::symlink(root, root.join("sub/loop")).unwrap();

        let walker = DirectoryWalker::new(["js"]);
        let files = walker.walk(&[root.to_path_buf()]).unwrap();
        assert_eq!(files.len(), 1);

        let tree = walker.walk_tree(root).unwrap();
        assert_eq!(tree.flatten().len(), 1);
    }
}
