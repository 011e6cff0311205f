//! Version bumps: parse the bump argument, compute the next version, patch
//! the `VersionMajor/Minor/Patch` constants in the Go source, and (for
//! keyword bumps) cut the matching release notes out of the changelog.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::{AppContext, BumpArgs};
use crate::core::{
    changelog::release_notes,
    error::{DevError, Outcome},
};
use crate::infra::{
    config::{ReleaseConfig, load_config},
    io::{read_text, run_command, write_atomic},
};

/// `major.minor.patch`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = DevError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DevError::InvalidVersionArgument(s.to_string());
        let mut parts = s.trim().split('.');
        let mut next = || -> Result<u64, DevError> {
            parts
                .next()
                .filter(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
                .ok_or_else(invalid)?
                .parse()
                .map_err(|_| invalid())
        };
        let version = Version::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

/// Bump argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bump {
    Major,
    Minor,
    Patch,
    /// An explicit `major.minor.patch`
    Exact(Version),
}

impl FromStr for Bump {
    type Err = DevError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(Bump::Major),
            "minor" => Ok(Bump::Minor),
            "patch" => Ok(Bump::Patch),
            other => other.parse().map(Bump::Exact),
        }
    }
}

impl Bump {
    /// True for `major`, `minor` and `patch`.
    pub fn is_keyword(self) -> bool {
        !matches!(self, Bump::Exact(_))
    }

    pub fn apply(self, current: Version) -> Version {
        match self {
            Bump::Major => Version::new(current.major + 1, 0, 0),
            Bump::Minor => Version::new(current.major, current.minor + 1, 0),
            Bump::Patch => Version::new(current.major, current.minor, current.patch + 1),
            Bump::Exact(v) => v,
        }
    }
}

/// Source of the version currently released.
pub trait VersionProvider {
    fn current(&self) -> Result<Version>;
}

/// Asks the built tool itself, e.g. `ffcss version`.
#[derive(Debug, Clone)]
pub struct CommandVersionProvider {
    pub argv: Vec<String>,
    pub dir: PathBuf,
}

impl VersionProvider for CommandVersionProvider {
    fn current(&self) -> Result<Version> {
        let out = run_command(&self.argv, &self.dir)
            .map_err(|e| DevError::VersionCommand(format!("{e:#}")))?;
        out.parse::<Version>()
            .map_err(|_| DevError::VersionCommand(format!("unparsable output {out:?}")).into())
    }
}

/// Reads the `Version*` constants straight from the Go source.
#[derive(Debug, Clone)]
pub struct SourceVersionProvider {
    pub file: PathBuf,
}

impl VersionProvider for SourceVersionProvider {
    fn current(&self) -> Result<Version> {
        let text = read_text(&self.file)?;
        let component = |c: &VersionConstant| -> Result<u64> {
            let caps = c.pattern.captures(&text).ok_or_else(|| {
                DevError::VersionCommand(format!(
                    "{} not found in {}",
                    c.name,
                    self.file.display()
                ))
            })?;
            Ok(caps[1].parse()?)
        };
        let [major, minor, patch] = &*CONSTANTS;
        Ok(Version::new(
            component(major)?,
            component(minor)?,
            component(patch)?,
        ))
    }
}

struct VersionConstant {
    name: &'static str,
    pattern: Regex,
}

static CONSTANTS: LazyLock<[VersionConstant; 3]> = LazyLock::new(|| {
    ["VersionMajor", "VersionMinor", "VersionPatch"].map(|name| VersionConstant {
        name,
        pattern: Regex::new(&format!(r"{name} = (\d+)")).expect("constant pattern is valid"),
    })
});

/// Replace the first `VersionMajor = N` (and Minor, Patch) in `source`.
/// Missing constants are left alone and logged.
pub fn set_version_constants(source: &str, version: Version) -> String {
    let values = [version.major, version.minor, version.patch];
    let mut out = source.to_string();
    for (constant, value) in CONSTANTS.iter().zip(values) {
        if !constant.pattern.is_match(&out) {
            warn!(constant = constant.name, "version constant not found");
            continue;
        }
        out = constant
            .pattern
            .replace(&out, format!("{} = {value}", constant.name))
            .into_owned();
    }
    out
}

/// Files a bump changed or would change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BumpReport {
    pub previous: Option<Version>,
    pub version: Version,
    pub source: String,
    /// Release notes payload, keyword bumps only
    pub notes: Option<String>,
}

/// Compute a bump against `provider` and the contents of the release files.
///
/// Pure apart from the provider; callers decide what to write.
pub fn plan_bump(
    bump: Bump,
    provider: &dyn VersionProvider,
    source: &str,
    changelog: Option<&str>,
) -> Result<BumpReport> {
    let previous = if bump.is_keyword() {
        Some(provider.current()?)
    } else {
        None
    };
    // Exact bumps ignore the current version.
    let version = bump.apply(previous.unwrap_or(Version::new(0, 0, 0)));

    let notes = match (bump.is_keyword(), changelog) {
        (true, Some(text)) => Some(release_notes(text, version).unwrap_or_else(|| {
            warn!(%version, "changelog has no section for this version");
            String::new()
        })),
        (true, None) => Some(String::new()),
        (false, _) => None,
    };

    Ok(BumpReport {
        previous,
        version,
        source: set_version_constants(source, version),
        notes,
    })
}

fn provider_for(release: &ReleaseConfig, root: &Path) -> Box<dyn VersionProvider> {
    if release.version_command.is_empty() {
        Box::new(SourceVersionProvider {
            file: root.join(&release.version_file),
        })
    } else {
        Box::new(CommandVersionProvider {
            argv: release.version_command.clone(),
            dir: root.to_path_buf(),
        })
    }
}

/// `ffdev bump major|minor|patch|X.Y.Z`
pub fn run(args: BumpArgs, ctx: &AppContext) -> Result<Outcome> {
    // Reject bad arguments before reading or touching anything.
    let bump: Bump = args.version.parse()?;

    let config = load_config(&ctx.root)?;
    let release = &config.release;
    let version_file = ctx.root.join(&release.version_file);
    let source = read_text(&version_file)?;

    let changelog_path = ctx.root.join(&release.changelog);
    let changelog = if bump.is_keyword() {
        Some(read_text(&changelog_path)?)
    } else {
        None
    };

    let provider = provider_for(release, &ctx.root);
    let report = plan_bump(bump, provider.as_ref(), &source, changelog.as_deref())?;
    let notes_path = ctx.root.join(&release.release_notes);

    if !ctx.dry_run {
        write_atomic(&version_file, report.source.as_bytes())
            .with_context(|| format!("Failed to update {}", version_file.display()))?;
        if let Some(notes) = &report.notes {
            write_atomic(&notes_path, notes.as_bytes())?;
        }
    }
    info!(version = %report.version, "version bumped");

    if !ctx.quiet {
        let from = report
            .previous
            .map(|v| format!("{v} -> "))
            .unwrap_or_default();
        let line = format!("{from}{}", report.version);
        let prefix = if ctx.dry_run { "would bump" } else { "bumped" };
        if ctx.no_color {
            println!("{prefix} {line}");
        } else {
            println!("{prefix} {}", line.green());
        }
        if report.notes.is_some() {
            println!("release notes: {}", notes_path.display());
        }
    }

    Ok(Outcome::Clean)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Version);

    impl VersionProvider for Fixed {
        fn current(&self) -> Result<Version> {
            Ok(self.0)
        }
    }

    struct Unreachable;

    impl VersionProvider for Unreachable {
        fn current(&self) -> Result<Version> {
            panic!("explicit versions must not query the provider")
        }
    }

    const SOURCE: &str = "const (\n\tVersionMajor = 1\n\tVersionMinor = 2\n\tVersionPatch = 3\n)\n";

    #[test]
    fn test_parse_version() {
        assert_eq!("1.2.3".parse::<Version>(), Ok(Version::new(1, 2, 3)));
        assert_eq!(" 0.10.0\n".parse::<Version>(), Ok(Version::new(0, 10, 0)));
        for bad in ["1.2", "1.2.3.4", "1..3", "a.b.c", "v1.2.3", "", "1.2.-3"] {
            assert!(bad.parse::<Version>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_bump_keywords() {
        let current = Version::new(1, 2, 3);
        assert_eq!(Bump::Major.apply(current), Version::new(2, 0, 0));
        assert_eq!(Bump::Minor.apply(current), Version::new(1, 3, 0));
        assert_eq!(Bump::Patch.apply(current), Version::new(1, 2, 4));
    }

    #[test]
    fn test_bump_argument_parsing() {
        assert_eq!("minor".parse::<Bump>(), Ok(Bump::Minor));
        assert_eq!(
            "4.0.1".parse::<Bump>(),
            Ok(Bump::Exact(Version::new(4, 0, 1)))
        );
        assert_eq!(
            "Minor".parse::<Bump>(),
            Err(DevError::InvalidVersionArgument("Minor".into()))
        );
    }

    #[test]
    fn test_set_version_constants() {
        let out = set_version_constants(SOURCE, Version::new(1, 3, 0));
        assert_eq!(
            out,
            "const (\n\tVersionMajor = 1\n\tVersionMinor = 3\n\tVersionPatch = 0\n)\n"
        );
    }

    #[test]
    fn test_set_version_constants_tolerates_missing() {
        let out = set_version_constants("VersionMajor = 0\n", Version::new(2, 0, 0));
        assert_eq!(out, "VersionMajor = 2\n");
    }

    #[test]
    fn test_plan_keyword_bump_extracts_notes() -> Result<()> {
        let changelog = "# Changelog\n\n## [1.3.0] - 2024-01-01\nNotes here.\n## [1.2.0] - 2023-01-01\n";
        let report = plan_bump(
            Bump::Minor,
            &Fixed(Version::new(1, 2, 3)),
            SOURCE,
            Some(changelog),
        )?;

        assert_eq!(report.previous, Some(Version::new(1, 2, 3)));
        assert_eq!(report.version, Version::new(1, 3, 0));
        assert_eq!(report.notes.as_deref(), Some("Notes here."));
        assert!(report.source.contains("VersionMinor = 3"));
        Ok(())
    }

    #[test]
    fn test_plan_keyword_bump_without_section() -> Result<()> {
        let report = plan_bump(
            Bump::Major,
            &Fixed(Version::new(0, 2, 0)),
            SOURCE,
            Some("## [0.2.0] - 2021-05-01\nold\n"),
        )?;
        assert_eq!(report.version, Version::new(1, 0, 0));
        assert_eq!(report.notes.as_deref(), Some(""));
        Ok(())
    }

    #[test]
    fn test_plan_exact_bump_skips_provider_and_notes() -> Result<()> {
        let report = plan_bump(
            Bump::Exact(Version::new(3, 1, 4)),
            &Unreachable,
            SOURCE,
            None,
        )?;
        assert_eq!(report.previous, None);
        assert_eq!(report.notes, None);
        assert!(report.source.contains("VersionPatch = 4"));
        Ok(())
    }

    #[test]
    fn test_source_version_provider() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let file = dir.path().join("ffcss.go");
        std::fs::write(&file, SOURCE)?;

        let provider = SourceVersionProvider { file };
        assert_eq!(provider.current()?, Version::new(1, 2, 3));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_command_version_provider() {
        let provider = CommandVersionProvider {
            argv: vec!["echo".into(), "0.2.0".into()],
            dir: PathBuf::from("."),
        };
        assert_eq!(provider.current().unwrap(), Version::new(0, 2, 0));

        let garbage = CommandVersionProvider {
            argv: vec!["echo".into(), "dev".into()],
            dir: PathBuf::from("."),
        };
        let err = garbage.current().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DevError>(),
            Some(DevError::VersionCommand(_))
        ));
    }
}
