//! Release-notes extraction from a keep-a-changelog style `CHANGELOG.md`.

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::cli::{AppContext, NotesArgs};
use crate::core::{
    error::{DevError, Outcome},
    version::Version,
};
use crate::infra::{config::load_config, io::read_text};

/// `## [1.3.0] - 2024-01-01`
static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^## \[(\d+)\.(\d+)\.(\d+)\] - \d{4}-\d{2}-\d{2}$")
        .expect("section header pattern is valid")
});

/// Version named by a section header line, if it is one.
fn section_version(line: &str) -> Option<Version> {
    let caps = SECTION_HEADER.captures(line.trim_end())?;
    let component = |i: usize| caps[i].parse::<u64>().ok();
    Some(Version::new(component(1)?, component(2)?, component(3)?))
}

/// Payload of the section for `version`: every line after its header up to
/// the next section header, with surrounding blank lines trimmed.
///
/// `None` when the changelog has no header for `version`.
pub fn release_notes(changelog: &str, version: Version) -> Option<String> {
    let mut lines = changelog.lines();
    lines.by_ref().find(|line| section_version(line) == Some(version))?;

    let body: Vec<&str> = lines
        .take_while(|line| section_version(line).is_none())
        .collect();

    let first = body.iter().position(|l| !l.trim().is_empty());
    let last = body.iter().rposition(|l| !l.trim().is_empty());
    Some(match (first, last) {
        (Some(first), Some(last)) => body[first..=last].join("\n"),
        _ => String::new(),
    })
}

/// `ffdev notes VERSION`
pub fn run(args: NotesArgs, ctx: &AppContext) -> Result<Outcome> {
    let version: Version = args.version.parse()?;
    let config = load_config(&ctx.root)?;
    let changelog = read_text(ctx.root.join(&config.release.changelog))?;

    let notes =
        release_notes(&changelog, version).ok_or(DevError::ReleaseNotesNotFound(version))?;
    if !ctx.quiet {
        println!("{notes}");
    }
    Ok(Outcome::Clean)
}
