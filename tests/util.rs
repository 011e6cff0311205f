//! Shared test utilities for integration tests
//!
//! Builds a small ffcss-shaped Go tree in a temp dir and wraps the
//! binary invocation.

#![allow(dead_code)]

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use std::process::Command;

pub const CATALOG_GO: &str = "package ffcss

// Catalog maps theme names to manifests.
type Catalog map[string]Theme

// Lookup finds a theme by name.
// It returns false when missing.
func (c Catalog) Lookup(name string) (Theme, bool) {
\tt, ok := c[name]
\treturn t, ok
}

func init() {
\tregister()
}

func Unused() {}
";

pub const CATALOG_TEST_GO: &str = "package ffcss

func TestLookup(t *testing.T) {
\t_ = Catalog{}
}
";

pub const THEME_GO: &str = "package ffcss

// Theme is a parsed manifest.
type Theme struct {
\tName string
}

// Name returns the theme's display name.
func (t Theme) DisplayName() string {
\tif t.Name == \"\" {
\t\treturn \"unnamed\"
\t}
\treturn t.Name
}
";

pub const FFCSS_GO: &str = "package ffcss

const (
\tVersionMajor = 1
\tVersionMinor = 2
\tVersionPatch = 3
)
";

pub const CHANGELOG_MD: &str = "# Changelog

## [1.3.0] - 2024-01-01

Notes here.

## [1.2.3] - 2023-06-01

- Older fix
";

/// Config that keeps the binary away from external tools.
pub const OFFLINE_CONFIG: &str = "[release]
version_command = [\"echo\", \"1.2.3\"]

[format]
command = [\"true\"]
";

/// Temp project root with the Go fixture sources, release files and config.
pub fn go_project() -> assert_fs::TempDir {
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    for (path, text) in [
        ("catalog.go", CATALOG_GO),
        ("catalog_test.go", CATALOG_TEST_GO),
        ("theme.go", THEME_GO),
        ("ffcss.go", FFCSS_GO),
        ("CHANGELOG.md", CHANGELOG_MD),
        ("ffdev.toml", OFFLINE_CONFIG),
    ] {
        tmp.child(path).write_str(text).expect("write fixture");
    }

    tmp
}

/// `ffdev --root <dir> --no-color ...`
pub fn ffdev(root: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("ffdev").expect("ffdev binary");
    cmd.arg("--root").arg(root).arg("--no-color");
    cmd.env_remove("FFDEV_LOG").env_remove("RUST_LOG");
    cmd
}
