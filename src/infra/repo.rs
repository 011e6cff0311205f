//! Directory-backed source repository.
//!
//! Lists the project root the way `*.go` globs it (one level, no dotfiles,
//! .gitignore not consulted),
//! names units by their root-relative path, and persists with an atomic
//! whole-file write.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::unit::{SourceRepository, SourceUnit};
use crate::infra::config::Config;
use crate::infra::io::{read_text, write_atomic};
use crate::infra::walk::FileWalker;

pub struct DirRepository {
    root: PathBuf,
    walker: FileWalker,
}

impl DirRepository {
    /// Repository over `root` using the configured extension and ignores.
    pub fn new(root: &Path, config: &Config) -> Result<Self> {
        let walker = FileWalker::flat(&config.ignore_patterns)
            .context("Invalid ignore pattern in configuration")?
            .with_extension(&config.source.extension);

        Ok(Self {
            root: root.to_path_buf(),
            walker,
        })
    }

    /// Paths given relative to the project root resolve against it.
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl SourceRepository for DirRepository {
    fn list_units(&self) -> Result<Vec<SourceUnit>> {
        self.walker
            .walk_files(&self.root)
            .into_iter()
            .map(|abs| {
                let text = read_text(&abs)?;
                let rel = abs.strip_prefix(&self.root).unwrap_or(&abs);
                Ok(SourceUnit::from_text(rel, &text))
            })
            .collect()
    }

    fn load(&self, path: &Path) -> Result<SourceUnit> {
        let text = read_text(self.resolve(path))?;
        Ok(SourceUnit::from_text(path, &text))
    }

    fn persist(&mut self, unit: &SourceUnit) -> Result<()> {
        let target = self.resolve(&unit.path);
        tracing::debug!(path = %target.display(), lines = unit.lines.len(), "rewriting unit");
        write_atomic(&target, unit.render().as_bytes())
    }

    /// Compares the files both paths resolve to, following symlinks when
    /// they exist.
    fn same_unit(&self, a: &Path, b: &Path) -> bool {
        let canonical = |path: &Path| {
            let resolved = self.resolve(path);
            std::fs::canonicalize(&resolved).unwrap_or(resolved)
        };
        canonical(a) == canonical(b)
    }
}
