use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use ffdev::cli::{Cli, Commands};
use ffdev::core::{self, Outcome, exit_code_for};
use tracing_subscriber::EnvFilter;

/// Log filter from FFDEV_LOG, then RUST_LOG, then the -v count.
fn init_tracing(verbose: u8, no_color: bool) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("FFDEV_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(!no_color)
        .init();
}

fn dispatch(cli: Cli) -> Result<Outcome> {
    // Build a context once, pass everywhere
    let ctx = cli.context();

    match cli.command {
        Commands::Where(args) => core::run_where(args, &ctx),
        Commands::Long(args) => core::run_long(args, &ctx),
        Commands::Untested(args) => core::run_untested(args, &ctx),
        Commands::Move(args) => core::move_run(args, &ctx),
        Commands::Bump(args) => core::bump_run(args, &ctx),
        Commands::Notes(args) => core::notes_run(args, &ctx),
        Commands::Themes(args) => core::themes_run(args, &ctx),
        Commands::Init(args) => ffdev::infra::config_init(args, &ctx).map(|()| Outcome::Clean),
        Commands::Completions(args) => ffdev::completion::run(args, &ctx),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.no_color);

    let code = match dispatch(cli) {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            eprintln!("error: {err:#}");
            exit_code_for(&err)
        }
    };
    ExitCode::from(code as u8)
}
