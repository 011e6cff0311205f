use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use std::process::Command;

/// Read a whole text file.
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}

/// Atomic write with robust temp file strategy
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    // Same-dir tempfile so the final rename stays on one filesystem
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    // Preserve original permissions
    let perms = fs::metadata(path).map(|m| m.permissions()).ok();

    let tmp = match tempfile::NamedTempFile::new_in(dir) {
        Ok(t) => t,
        Err(_) => tempfile::NamedTempFile::new()?, // fallback to /tmp
    };

    // Write the content fully
    use std::io::Write;
    let mut file = tmp.as_file();
    file.write_all(data)?;
    file.sync_all()?;

    if let Some(perms) = perms {
        fs::set_permissions(tmp.path(), perms).context("set temp permissions")?;
    }

    // Atomically replace the destination
    match tmp.persist(path) {
        Ok(_) => {}
        Err(e) => {
            // Different filesystem? Try copy fallback
            fs::copy(e.file.path(), path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
    }

    // fsync parent dir to ensure durability on Unix
    #[cfg(unix)]
    {
        if let Ok(parent_file) = fs::File::open(dir) {
            let _ = parent_file.sync_all();
        }
    }

    Ok(())
}

/// Run `argv` in `dir` and return its trimmed stdout.
///
/// Fails when the program cannot be spawned or exits unsuccessfully; the
/// error carries the program's stderr.
pub fn run_command(argv: &[String], dir: &Path) -> Result<String> {
    let Some((program, args)) = argv.split_first() else {
        bail!("empty command");
    };

    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .with_context(|| format!("Failed to run {}", argv.join(" ")))?;

    if !output.status.success() {
        bail!(
            "{} exited with {}: {}",
            argv.join(" "),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_replaces_contents() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("ffcss.go");
        fs::write(&path, "old contents that are longer")?;

        write_atomic(&path, b"new")?;
        assert_eq!(read_text(&path)?, "new");

        // No temp files left behind
        let entries = fs::read_dir(dir.path())?.count();
        assert_eq!(entries, 1);
        Ok(())
    }

    #[test]
    fn test_write_atomic_creates_missing_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("release_notes.md");
        write_atomic(&path, b"notes")?;
        assert_eq!(read_text(&path)?, "notes");
        Ok(())
    }

    #[test]
    fn test_read_text_names_missing_file() {
        let err = read_text("/definitely/not/here.go").unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.go"));
    }

    #[test]
    fn test_run_command_rejects_empty() {
        assert!(run_command(&[], Path::new(".")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_captures_stdout() -> Result<()> {
        let argv = vec!["echo".to_string(), "1.2.3".to_string()];
        assert_eq!(run_command(&argv, Path::new("."))?, "1.2.3");

        let failing = vec!["false".to_string()];
        assert!(run_command(&failing, Path::new(".")).is_err());
        Ok(())
    }
}
