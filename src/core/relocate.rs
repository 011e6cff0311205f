//! Move a function, together with its documentation block, from one source
//! file to the end of another.
//!
//! The edit is computed on in-memory units first; only a successful lookup
//! leads to writes. Each file is replaced atomically, but the two writes are
//! not a transaction: the destination is written first, so an interruption
//! leaves the function duplicated rather than lost.

use std::path::{Path, PathBuf};

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::cli::{AppContext, MoveArgs};
use crate::core::{
    error::{DevError, Outcome},
    scan::find_by_name,
    unit::{SourceRepository, SourceUnit},
};
use crate::infra::{config::load_config, io::run_command, repo::DirRepository};

/// What a move did (or would do, in a dry run).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    pub name: String,
    pub from: PathBuf,
    pub to: PathBuf,
    /// 0-based first removed line (documentation start)
    pub removed_start: usize,
    /// 0-based last removed line (closing brace)
    pub removed_end: usize,
    /// Lines appended to the destination, separator included
    pub appended: usize,
}

/// Move `name` from `from` to the end of `to`, in memory.
///
/// `to` gains a blank separator line, the documentation block and the body;
/// `from` loses exactly the documentation-start..=body-end range. On
/// `SignatureNotFound` neither unit is touched.
#[instrument(level = "debug", skip(from, to), fields(source = %from.name(), dest = %to.name()))]
pub fn move_function(
    name: &str,
    from: &mut SourceUnit,
    to: &mut SourceUnit,
) -> Result<MoveReport, DevError> {
    let record = find_by_name(from, name)?;
    let start = record.doc_start();
    let end = record.end_line();

    let block: Vec<String> = from.lines.drain(start..=end).collect();
    let appended = block.len() + 1;

    to.lines.push(String::new());
    to.lines.extend(block);

    Ok(MoveReport {
        name: record.qualified_name(),
        from: from.path.clone(),
        to: to.path.clone(),
        removed_start: start,
        removed_end: end,
        appended,
    })
}

/// Runs the project formatter after an edit.
pub trait SourceFormatter {
    fn format(&self, root: &Path) -> Result<()>;
}

/// Formatter backed by an external command such as `make format`.
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    pub argv: Vec<String>,
}

impl SourceFormatter for CommandFormatter {
    fn format(&self, root: &Path) -> Result<()> {
        if self.argv.is_empty() {
            return Ok(());
        }
        run_command(&self.argv, root).map(|_| ())
    }
}

/// Load both units, move, persist destination then source, format.
///
/// A formatter failure is logged and otherwise ignored: the move itself
/// already happened.
pub fn execute(
    repo: &mut dyn SourceRepository,
    formatter: &dyn SourceFormatter,
    root: &Path,
    args: &MoveArgs,
    dry_run: bool,
) -> Result<MoveReport> {
    if repo.same_unit(&args.from, &args.to) {
        return Err(DevError::InvalidArgument(format!(
            "source and destination are the same file: {}",
            args.from.display()
        ))
        .into());
    }

    let mut from = repo.load(&args.from)?;
    let mut to = repo.load(&args.to)?;
    let report = move_function(&args.name, &mut from, &mut to)?;

    if dry_run {
        return Ok(report);
    }

    repo.persist(&to)?;
    repo.persist(&from)?;
    info!(name = %report.name, "function moved");

    if let Err(err) = formatter.format(root) {
        warn!("formatter failed: {err:#}");
    }

    Ok(report)
}

/// `ffdev move NAME FROM TO`
pub fn run(args: MoveArgs, ctx: &AppContext) -> Result<Outcome> {
    let config = load_config(&ctx.root)?;
    let mut repo = DirRepository::new(&ctx.root, &config)?;
    let formatter = CommandFormatter {
        argv: config.format.command.clone(),
    };

    let report = execute(&mut repo, &formatter, &ctx.root, &args, ctx.dry_run)?;

    if !ctx.quiet {
        let summary = format!(
            "{} lines {}-{} of {} -> end of {}",
            report.name,
            report.removed_start + 1,
            report.removed_end + 1,
            report.from.display(),
            report.to.display()
        );
        match (ctx.dry_run, ctx.no_color) {
            (true, true) => println!("DRY RUN: would move {summary}"),
            (true, false) => println!("{} {summary}", "DRY RUN: would move".yellow()),
            (false, true) => println!("moved {summary}"),
            (false, false) => println!("{} moved {summary}", "✓".green()),
        }
    }

    Ok(Outcome::Clean)
}
