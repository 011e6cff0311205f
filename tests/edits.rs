//! Integration tests for the commands that rewrite files: move and bump.
//!
//! The fixture config points the version and format commands at `echo`
//! and `true`, so these only run on unix.
#![cfg(unix)]

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;

mod util;
use util::{CATALOG_GO, FFCSS_GO, THEME_GO, ffdev, go_project};

#[test]
fn move_relocates_function_with_docs() {
    let tmp = go_project();

    ffdev(tmp.path())
        .args(["move", "DisplayName", "theme.go", "catalog.go"])
        .assert()
        .success()
        .stdout("moved (t Theme)DisplayName lines 8-14 of theme.go -> end of catalog.go\n");

    tmp.child("theme.go").assert(
        "package ffcss\n\n// Theme is a parsed manifest.\ntype Theme struct {\n\tName string\n}\n\n",
    );

    let expected = format!(
        "{CATALOG_GO}\n// Name returns the theme's display name.\n\
         func (t Theme) DisplayName() string {{\n\
         \tif t.Name == \"\" {{\n\
         \t\treturn \"unnamed\"\n\
         \t}}\n\
         \treturn t.Name\n\
         }}\n"
    );
    tmp.child("catalog.go").assert(expected);
}

#[test]
fn moved_function_is_found_in_its_new_home() {
    let tmp = go_project();

    ffdev(tmp.path())
        .args(["--quiet", "move", "Unused", "catalog.go", "theme.go"])
        .assert()
        .success()
        .stdout("");

    ffdev(tmp.path())
        .args(["where", "Unused"])
        .assert()
        .success()
        .stdout("theme.go:16\n");
}

#[test]
fn move_missing_function_touches_nothing() {
    let tmp = go_project();

    ffdev(tmp.path())
        .args(["move", "Nope", "theme.go", "catalog.go"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "signature for Nope not found in theme.go",
        ));

    tmp.child("theme.go").assert(THEME_GO);
    tmp.child("catalog.go").assert(CATALOG_GO);
}

#[test]
fn move_onto_same_file_alias_is_rejected() {
    let tmp = go_project();

    ffdev(tmp.path())
        .args(["move", "Unused", "catalog.go", "./catalog.go"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("same file"));

    tmp.child("catalog.go").assert(CATALOG_GO);
}

#[test]
fn move_dry_run_touches_nothing() {
    let tmp = go_project();

    ffdev(tmp.path())
        .args(["--dry-run", "move", "Lookup", "catalog.go", "theme.go"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("DRY RUN: would move (c Catalog)Lookup"));

    tmp.child("catalog.go").assert(CATALOG_GO);
    tmp.child("theme.go").assert(THEME_GO);
}

#[test]
fn move_survives_failing_formatter() {
    let tmp = go_project();
    tmp.child("ffdev.toml")
        .write_str("[format]\ncommand = [\"false\"]\n")
        .unwrap();

    ffdev(tmp.path())
        .args(["move", "Unused", "catalog.go", "theme.go"])
        .assert()
        .success()
        .stderr(predicate::str::contains("formatter failed"));

    tmp.child("theme.go")
        .assert(predicate::str::ends_with("\nfunc Unused() {}\n"));
}

#[test]
fn bump_minor_rewrites_constants_and_notes() {
    let tmp = go_project();

    ffdev(tmp.path())
        .args(["bump", "minor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bumped 1.2.3 -> 1.3.0"));

    tmp.child("ffcss.go").assert(
        "package ffcss\n\nconst (\n\tVersionMajor = 1\n\tVersionMinor = 3\n\tVersionPatch = 0\n)\n",
    );
    tmp.child("release_notes.md").assert("Notes here.");
}

#[test]
fn bump_explicit_version_skips_notes() {
    let tmp = go_project();

    ffdev(tmp.path())
        .args(["bump", "2.0.1"])
        .assert()
        .success()
        .stdout("bumped 2.0.1\n");

    tmp.child("ffcss.go")
        .assert(predicate::str::contains("VersionMajor = 2"))
        .assert(predicate::str::contains("VersionPatch = 1"));
    tmp.child("release_notes.md").assert(predicate::path::missing());
}

#[test]
fn bump_invalid_argument_exits_before_writing() {
    let tmp = go_project();

    ffdev(tmp.path())
        .args(["bump", "huge"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid argument huge"));

    tmp.child("ffcss.go").assert(FFCSS_GO);
}

#[test]
fn bump_dry_run_writes_nothing() {
    let tmp = go_project();

    ffdev(tmp.path())
        .args(["--dry-run", "bump", "major"])
        .assert()
        .success()
        .stdout(predicate::str::contains("would bump 1.2.3 -> 2.0.0"));

    tmp.child("ffcss.go").assert(FFCSS_GO);
    tmp.child("release_notes.md").assert(predicate::path::missing());
}

#[test]
fn bump_failing_version_command() {
    let tmp = go_project();
    tmp.child("ffdev.toml")
        .write_str("[release]\nversion_command = [\"false\"]\n")
        .unwrap();

    ffdev(tmp.path())
        .args(["bump", "patch"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("version command failed"));

    tmp.child("ffcss.go").assert(FFCSS_GO);
}
