//! Source units: whole-file line snapshots, and the repository seam that
//! lists, loads and persists them.
//!
//! Notes
//! - A unit is read once, edited in memory, then rewritten wholesale.
//! - Line endings (LF/CRLF) and the final newline are remembered so an
//!   untouched line renders byte-for-byte as it was read.

use std::path::{Component, Path, PathBuf};

use anyhow::{Result, bail};

/// One source file as an ordered sequence of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Path as listed or given on the command line (used in locations)
    pub path: PathBuf,
    /// Lines without their terminators
    pub lines: Vec<String>,
    /// Whether the text ended with a line terminator
    pub trailing_newline: bool,
    /// Whether lines were terminated with "\r\n"
    pub crlf: bool,
}

impl SourceUnit {
    /// Split `text` into lines, remembering its line-ending layout.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            path: path.into(),
            lines: text.lines().map(str::to_owned).collect(),
            trailing_newline: text.ends_with('\n'),
            crlf: text.contains("\r\n"),
        }
    }

    /// Display name used as the file half of `file:line` locations.
    pub fn name(&self) -> String {
        self.path.display().to_string()
    }

    /// True when the file name ends with `suffix` (e.g. "_test.go").
    pub fn is_test_unit(&self, suffix: &str) -> bool {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(suffix))
    }

    /// Join the lines back into file contents.
    pub fn render(&self) -> String {
        let sep = if self.crlf { "\r\n" } else { "\n" };
        let mut out = self.lines.join(sep);
        if self.trailing_newline && !self.lines.is_empty() {
            out.push_str(sep);
        }
        out
    }
}

/// Where source units come from and go back to.
///
/// The directory-backed implementation lives in `infra::repo`; tests use
/// [`MemoryRepository`].
pub trait SourceRepository {
    /// Every unit in the project, in a stable order.
    fn list_units(&self) -> Result<Vec<SourceUnit>>;

    /// Load a single unit by path.
    fn load(&self, path: &Path) -> Result<SourceUnit>;

    /// Replace the stored contents of `unit.path` with `unit`.
    fn persist(&mut self, unit: &SourceUnit) -> Result<()>;

    /// True when both paths name the same stored unit. The default compares
    /// them lexically, ignoring `.` components.
    fn same_unit(&self, a: &Path, b: &Path) -> bool {
        lexical(a) == lexical(b)
    }
}

/// `path` without `.` components, so `./a.go` and `a.go` compare equal.
fn lexical(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// In-memory repository; `list_units` returns units sorted by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    units: Vec<SourceUnit>,
}

impl MemoryRepository {
    pub fn new(units: Vec<SourceUnit>) -> Self {
        Self { units }
    }

    /// Convenience constructor from `(path, text)` pairs.
    pub fn from_sources(sources: &[(&str, &str)]) -> Self {
        Self::new(
            sources
                .iter()
                .map(|(path, text)| SourceUnit::from_text(*path, text))
                .collect(),
        )
    }

    /// Current rendered contents of `path`, if stored.
    pub fn text(&self, path: &str) -> Option<String> {
        self.units
            .iter()
            .find(|u| u.path == Path::new(path))
            .map(SourceUnit::render)
    }
}

impl SourceRepository for MemoryRepository {
    fn list_units(&self) -> Result<Vec<SourceUnit>> {
        let mut units = self.units.clone();
        units.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(units)
    }

    fn load(&self, path: &Path) -> Result<SourceUnit> {
        match self.units.iter().find(|u| u.path == path) {
            Some(unit) => Ok(unit.clone()),
            None => bail!("no such unit: {}", path.display()),
        }
    }

    fn persist(&mut self, unit: &SourceUnit) -> Result<()> {
        match self.units.iter_mut().find(|u| u.path == unit.path) {
            Some(slot) => *slot = unit.clone(),
            None => self.units.push(unit.clone()),
        }
        Ok(())
    }
}
