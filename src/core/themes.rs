//! Markdown listing of the bundled theme manifests.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::{AppContext, ThemesArgs};
use crate::core::error::Outcome;
use crate::infra::{config::load_config, io::read_text, walk::FileWalker};

/// The subset of a theme manifest the listing needs. Unknown keys are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThemeManifest {
    #[serde(default)]
    pub name: Option<String>,

    pub download: String,

    /// Manifest format version the theme was written for
    #[serde(default)]
    pub ffcss: Option<u32>,
}

impl ThemeManifest {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Explicit name, else the repository name of a GitHub download URL.
    pub fn display_name(&self) -> Option<&str> {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return Some(name);
        }
        if self.download.starts_with("https://github.com") {
            return self.download.trim_end_matches('/').rsplit('/').next();
        }
        None
    }
}

/// A manifest together with the file it came from.
#[derive(Debug, Clone)]
pub struct Theme {
    pub path: PathBuf,
    pub manifest: ThemeManifest,
}

impl Theme {
    fn name(&self) -> String {
        match self.manifest.display_name() {
            Some(name) => name.to_string(),
            None => self
                .path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

/// Second-to-last `/` segment of a download URL, i.e. the owner in
/// `https://github.com/<owner>/<repo>`.
pub fn github_user(download: &str) -> Option<&str> {
    let segments: Vec<&str> = download.trim_end_matches('/').split('/').collect();
    match segments.as_slice() {
        [.., user, _] if !user.is_empty() => Some(*user),
        _ => None,
    }
}

/// `- [name](download) by [user](https://github.com/user)`
pub fn render_entry(theme: &Theme) -> String {
    let download = &theme.manifest.download;
    let mut line = format!("- [{}]({download})", theme.name());
    if let Some(user) = github_user(download) {
        line.push_str(&format!(" by [{user}](https://github.com/{user})"));
    }
    line
}

/// Read every `*.yaml` manifest in `dir`, in path order.
pub fn load_themes(dir: &Path) -> Result<Vec<Theme>> {
    let walker = FileWalker::flat(&[])?.with_extension("yaml");
    walker
        .walk_files(dir)
        .into_iter()
        .map(|path| {
            let text = read_text(&path)?;
            let manifest = ThemeManifest::parse(&text)
                .with_context(|| format!("Malformed theme manifest {}", path.display()))?;
            Ok(Theme { path, manifest })
        })
        .collect()
}

/// `ffdev themes [--min-ffcss N]`
pub fn run(args: ThemesArgs, ctx: &AppContext) -> Result<Outcome> {
    let config = load_config(&ctx.root)?;
    let dir = ctx.root.join(&config.themes.dir);
    let themes = load_themes(&dir)?;
    tracing::debug!(count = themes.len(), dir = %dir.display(), "loaded theme manifests");

    for theme in themes.iter().filter(|t| meets_minimum(t, args.min_ffcss)) {
        println!("{}", render_entry(theme));
    }
    Ok(Outcome::Clean)
}

/// Themes without an `ffcss` key only pass when no minimum is asked for.
fn meets_minimum(theme: &Theme, min: Option<u32>) -> bool {
    match min {
        Some(min) => theme.manifest.ffcss.is_some_and(|v| v >= min),
        None => true,
    }
}
