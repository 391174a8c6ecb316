//! Per-file dependency records.
//!
//! A [`DependencyInfo`] captures one source file's declared contract: the
//! symbols it provides to the rest of the corpus and the symbols it requires
//! from it. Records are built once per discovered file by the annotation
//! reader, are immutable for the rest of the resolution pass, and are keyed
//! by file path alone — two records are the same record iff they describe the
//! same file, regardless of what they provide or require.

use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// One source file's declared provides and requires.
///
/// Symbol lists are ordered-unique: symbols keep the order in which their
/// declarations appear in the file, and re-adding a symbol already present is
/// a no-op rather than an error. Declaration order matters for deterministic
/// resolution (requires are walked in the order they appear) and for stable
/// debug output.
///
/// # Examples
///
/// ```rust
/// use calcdeps::dependency::DependencyInfo;
/// use std::path::PathBuf;
///
/// let mut info = DependencyInfo::new(PathBuf::from("src/bird.js"));
/// info.add_provide("app.Bird");
/// info.add_require("app.Animal");
/// info.add_require("app.Animal"); // idempotent
///
/// assert_eq!(info.provides(), ["app.Bird"]);
/// assert_eq!(info.requires(), ["app.Animal"]);
/// ```
#[derive(Debug, Clone)]
pub struct DependencyInfo {
    file: PathBuf,
    provides: Vec<String>,
    requires: Vec<String>,
}

impl DependencyInfo {
    /// Create an empty record for `file`.
    ///
    /// Callers are expected to pass a canonical path so that identity
    /// comparisons are not fooled by `./` segments or symlinked spellings of
    /// the same file.
    #[must_use]
    pub fn new(file: PathBuf) -> Self {
        Self {
            file,
            provides: Vec::new(),
            requires: Vec::new(),
        }
    }

    /// The file this record describes.
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Symbols this file provides, in declaration order.
    #[must_use]
    pub fn provides(&self) -> &[String] {
        &self.provides
    }

    /// Symbols this file requires, in declaration order.
    #[must_use]
    pub fn requires(&self) -> &[String] {
        &self.requires
    }

    /// Record a provided symbol. Adding a symbol already present is a no-op.
    pub fn add_provide(&mut self, symbol: impl Into<String>) {
        let symbol = symbol.into();
        if !self.provides.contains(&symbol) {
            self.provides.push(symbol);
        }
    }

    /// Record a required symbol. Adding a symbol already present is a no-op.
    pub fn add_require(&mut self, symbol: impl Into<String>) {
        let symbol = symbol.into();
        if !self.requires.contains(&symbol) {
            self.requires.push(symbol);
        }
    }

    /// Render the debug registration line consumed by test-harness generators.
    ///
    /// Produces `register('<relative-path>', [<provides>], [<requires>]);`
    /// where the path is relative to `base` (falling back to the full path if
    /// the file lives outside `base`) and both symbol lists are sorted
    /// lexicographically so the rendering is deterministic.
    #[must_use]
    pub fn registration_line(&self, base: &Path) -> String {
        let relative = self.file.strip_prefix(base).unwrap_or(&self.file);
        format!(
            "register('{}', {}, {});",
            relative.display(),
            render_symbol_list(&self.provides),
            render_symbol_list(&self.requires),
        )
    }
}

/// Identity is the file path alone; provides/requires never participate.
impl PartialEq for DependencyInfo {
    fn eq(&self, other: &Self) -> bool {
        self.file == other.file
    }
}

impl Eq for DependencyInfo {}

impl Hash for DependencyInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.file.hash(state);
    }
}

fn render_symbol_list(symbols: &[String]) -> String {
    let mut sorted: Vec<&String> = symbols.iter().collect();
    sorted.sort();
    let quoted: Vec<String> = sorted.iter().map(|s| format!("'{s}'")).collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_add_provide_is_idempotent() {
        let mut info = DependencyInfo::new(PathBuf::from("a.js"));
        info.add_provide("app.One");
        info.add_provide("app.Two");
        info.add_provide("app.One");
        assert_eq!(info.provides(), ["app.One", "app.Two"]);
    }

    #[test]
    fn test_add_require_preserves_declaration_order() {
        let mut info = DependencyInfo::new(PathBuf::from("a.js"));
        info.add_require("z.last");
        info.add_require("a.first");
        assert_eq!(info.requires(), ["z.last", "a.first"]);
    }

    #[test]
    fn test_identity_ignores_symbols() {
        let mut a = DependencyInfo::new(PathBuf::from("same.js"));
        a.add_provide("x");
        let b = DependencyInfo::new(PathBuf::from("same.js"));
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_registration_line_relative_and_sorted() {
        let mut info = DependencyInfo::new(PathBuf::from("/project/src/bird.js"));
        info.add_provide("app.Sparrow");
        info.add_provide("app.Bird");
        info.add_require("app.Animal");

        let line = info.registration_line(Path::new("/project"));
        assert_eq!(
            line,
            "register('src/bird.js', ['app.Bird', 'app.Sparrow'], ['app.Animal']);"
        );
    }

    #[test]
    fn test_registration_line_outside_base_uses_full_path() {
        let info = DependencyInfo::new(PathBuf::from("/elsewhere/x.js"));
        let line = info.registration_line(Path::new("/project"));
        assert_eq!(line, "register('/elsewhere/x.js', [], []);");
    }
}
