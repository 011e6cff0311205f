//! **ffdev** - maintainer tooling for the ffcss Go tree
//!
//! Line-based function scanning (no Go parser) behind a handful of reports and
//! edits, plus release bookkeeping and the theme listing used in the README.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Core operations - scanning, reports, edits, release tooling
pub mod core {
    /// Domain errors and exit-status mapping
    pub mod error;
    pub use error::{DevError, Outcome, exit_code_for};

    /// Source units and the repository seam
    pub mod unit;
    pub use unit::{MemoryRepository, SourceRepository, SourceUnit};

    /// Line scanner: signatures, bodies, documentation blocks
    pub mod scan;
    pub use scan::{FunctionRecord, FunctionSignature, find_by_name, scan};

    /// Long-function, untested-function and lookup reports
    pub mod report;
    pub use report::{
        NamingRules, filter_by_body_size, find_untested, run_long, run_untested, run_where,
    };

    /// Moving a function between files
    pub mod relocate;
    pub use relocate::{move_function, run as move_run};

    /// Version parsing, bumps, source constant rewriting
    pub mod version;
    pub use version::{Bump, Version, VersionProvider, run as bump_run};

    /// Changelog section extraction
    pub mod changelog;
    pub use changelog::{release_notes, run as notes_run};

    /// Theme manifest listing
    pub mod themes;
    pub use themes::run as themes_run;
}

/// Infrastructure - configuration, file I/O, directory walking
pub mod infra {
    /// Layered configuration (file + FFDEV_* environment)
    pub mod config;
    pub use config::{Config, init as config_init, load_config};

    /// Whole-file reads, atomic writes, external commands
    pub mod io;
    pub use io::{read_text, run_command, write_atomic};

    /// Gitignore-aware directory listing
    pub mod walk;
    pub use walk::FileWalker;

    /// Directory-backed source repository
    pub mod repo;
    pub use repo::DirRepository;
}

pub use cli::{AppContext, Cli, Commands};
pub use infra::{Config, FileWalker, load_config};
