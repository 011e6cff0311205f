//! Filepath: src/infra/walk.rs
//! File listing for project sources and theme manifests.
//! - Respects .gitignore, .git/info/exclude, and global gitignore unless
//!   switched off (shell-glob listings switch it off)
//! - Extra ignore globs (early prune + late filter)
//! - Optional extension filter ("go", "yaml")
//! - Hidden files always skipped, like a shell glob
//! - Deterministic ordering for stable reports
//!
//! Backed by ripgrep's `ignore` crate and `globset`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, WalkBuilder};

/// Walker with optional gitignore handling, extra ignore globs and filters.
pub struct FileWalker
{
    /// Compiled set of additional ignore patterns
    ignore_patterns: GlobSet,

    /// Only keep files with this extension (without the dot)
    extension: Option<String>,

    /// Apply .gitignore and friends; default true
    respect_gitignore: bool,

    /// Maximum recursion depth; `Some(1)` lists a single directory
    max_depth: Option<usize>,
}

impl FileWalker
{
    /// Build a walker with additional ignore patterns (e.g. "vendor/**",
    /// "*_gen.go"). Patterns match on paths relative to the walk root.
    pub fn new(additional_ignores: &[String]) -> Result<Self>
    {
        let mut builder = GlobSetBuilder::new();

        for pattern in additional_ignores
        {
            builder.add(Glob::new(pattern)?);
        }

        Ok(Self {
            ignore_patterns: builder.build()?,
            extension: None,
            respect_gitignore: true,
            max_depth: None,
        })
    }

    /// Flat listing of one directory, the way `*.go` globs it: one level,
    /// no dotfiles, gitignore not consulted.
    pub fn flat(additional_ignores: &[String]) -> Result<Self>
    {
        Ok(Self::new(additional_ignores)?
            .with_max_depth(Some(1))
            .with_gitignore(false))
    }

    /// (Optional) Keep only files ending in `.<ext>`.
    pub fn with_extension(
        mut self,
        ext: &str,
    ) -> Self
    {
        self.extension = Some(
            ext.trim_start_matches('.')
                .to_string(),
        );
        self
    }

    /// (Optional) Apply or skip .gitignore, .git/info/exclude and the
    /// global gitignore.
    pub fn with_gitignore(
        mut self,
        respect: bool,
    ) -> Self
    {
        self.respect_gitignore = respect;
        self
    }

    /// (Optional) Limit recursion depth (`None` = unbounded).
    pub fn with_max_depth(
        mut self,
        depth: Option<usize>,
    ) -> Self
    {
        self.max_depth = depth;
        self
    }

    /// Internal: construct a configured WalkBuilder for `root`.
    fn build_walk(
        &self,
        root: &Path,
    ) -> WalkBuilder
    {
        let mut b = WalkBuilder::new(root);

        // WalkBuilder::hidden(true) => *skip* dotfiles
        b.hidden(true);

        b.git_ignore(self.respect_gitignore);
        b.git_global(self.respect_gitignore);
        b.git_exclude(self.respect_gitignore);
        b.ignore(self.respect_gitignore);
        b.max_depth(self.max_depth);

        // Early directory pruning using extra ignores on RELATIVE paths.
        let extra = self
            .ignore_patterns
            .clone();
        let base = root.to_path_buf();
        b.filter_entry(move |ent: &DirEntry| {
            let is_dir = ent
                .file_type()
                .map(|ft| ft.is_dir())
                .unwrap_or(false);
            let rel = ent
                .path()
                .strip_prefix(&base)
                .unwrap_or(ent.path());

            !(is_dir && extra.is_match(rel))
        });

        b
    }

    fn has_extension(
        &self,
        path: &Path,
    ) -> bool
    {
        match &self.extension
        {
            Some(ext) => path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == ext),
            None => true,
        }
    }

    /// Traverse files under `root`, respecting ignore rules and extra globs.
    /// Returns a **sorted** list of file paths for determinism.
    pub fn walk_files<P: AsRef<Path>>(
        &self,
        root: P,
    ) -> Vec<PathBuf>
    {
        let root_path = root.as_ref();
        let walker = self
            .build_walk(root_path)
            .build();

        let mut out: Vec<PathBuf> = walker
            .filter_map(|res| match res
            {
                Ok(entry) => Some(entry),
                Err(err) =>
                {
                    tracing::warn!(%err, "skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| {
                entry
                    .file_type()
                    .is_some_and(|ft| ft.is_file())
            })
            .map(|entry| entry.into_path())
            .filter(|abs| self.has_extension(abs))
            // Late file-level extra ignore filtering using RELATIVE path
            .filter(|abs| {
                let rel = abs
                    .strip_prefix(root_path)
                    .unwrap_or(abs);
                !self
                    .ignore_patterns
                    .is_match(rel)
            })
            .collect();

        out.sort();

        out
    }
}
