use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext {
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
    pub dry_run: bool,  // global --dry-run
    pub root: PathBuf,  // global --root
}

#[derive(Parser)]
#[command(name = "ffdev")]
#[command(
    about = "Maintainer tooling for the ffcss Go tree: locate, measure and move functions, cut releases"
)]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Show what would be done without writing anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Project root containing the Go sources
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,
}

impl Cli {
    pub fn context(&self) -> AppContext {
        AppContext {
            quiet: self.quiet,
            no_color: self.no_color,
            dry_run: self.dry_run,
            root: self.root.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the file:line of a function header
    Where(WhereArgs),

    /// Report functions whose body is longer than a threshold
    Long(LongArgs),

    /// Report functions without a matching Test function
    Untested(UntestedArgs),

    /// Move a function and its doc comment to the end of another file
    Move(MoveArgs),

    /// Bump the version constants and cut release notes
    Bump(BumpArgs),

    /// Print the changelog section for a version
    Notes(NotesArgs),

    /// List theme manifests as a markdown bullet list
    Themes(ThemesArgs),

    /// Initialize an ffdev.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct WhereArgs {
    /// Function name, bare or receiver-qualified (Theme.Name)
    pub name: String,

    /// Print a JSON document instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct LongArgs {
    /// Report bodies strictly longer than this many lines
    pub threshold: usize,

    /// Print a JSON document instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Default)]
pub struct UntestedArgs {
    /// Print a JSON document instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct MoveArgs {
    /// Function to move
    pub name: String,

    /// File the function currently lives in
    pub from: PathBuf,

    /// File the function is appended to
    pub to: PathBuf,
}

#[derive(Args, Debug)]
pub struct BumpArgs {
    /// major, minor, patch, or an explicit MAJOR.MINOR.PATCH
    pub version: String,
}

#[derive(Args, Debug)]
pub struct NotesArgs {
    /// Version whose section to print (MAJOR.MINOR.PATCH)
    pub version: String,
}

#[derive(Args, Debug, Default)]
pub struct ThemesArgs {
    /// Skip themes written for an older manifest format
    #[arg(long, value_name = "N")]
    pub min_ffcss: Option<u32>,
}

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}
