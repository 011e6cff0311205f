//! Domain error taxonomy and exit-code mapping.
//!
//! Every subcommand returns `anyhow::Result`; the errors that carry meaning
//! for the caller are raised as [`DevError`] and recovered in `main` by
//! downcasting, everything else is an opaque failure.

use std::path::PathBuf;

use crate::core::version::Version;

/// Errors a maintainer is expected to act on.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DevError {
    /// No header line matched the requested function name
    #[error("signature for {name} not found in {}", file.display())]
    SignatureNotFound { name: String, file: PathBuf },

    /// Bump argument is neither a keyword nor a `major.minor.patch` literal
    #[error("invalid argument {0}")]
    InvalidVersionArgument(String),

    /// The changelog has no section for the requested version
    #[error("no changelog section for version {0}")]
    ReleaseNotesNotFound(Version),

    /// The external version command failed or printed garbage
    #[error("version command failed: {0}")]
    VersionCommand(String),

    /// Arguments are well-formed but cannot be acted on
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Outcome of a command that ran to completion.
///
/// Reports distinguish a clean result from one with findings purely through
/// the exit status, so both are successes from the error-handling side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to report, or the requested action succeeded
    Clean,
    /// Violations were printed, or the lookup came up empty
    Findings,
}

impl Outcome {
    /// Process exit status for this outcome.
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Clean => 0,
            Outcome::Findings => 1,
        }
    }
}

/// Map a failed run to its exit status.
///
/// Tool failures share status 1 with findings; callers tell them apart by
/// what was printed. Domain errors are logged with their variant first.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(dev) = err.downcast_ref::<DevError>() {
        tracing::debug!(?dev, "domain error");
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_exit_codes() {
        assert_eq!(Outcome::Clean.exit_code(), 0);
        assert_eq!(Outcome::Findings.exit_code(), 1);
    }

    #[test]
    fn test_signature_not_found_message() {
        let err = DevError::SignatureNotFound {
            name: "Add".to_string(),
            file: PathBuf::from("math.go"),
        };
        assert_eq!(err.to_string(), "signature for Add not found in math.go");
    }

    #[test]
    fn test_exit_code_survives_context() {
        let err = anyhow::Error::new(DevError::InvalidVersionArgument("huge".into()))
            .context("while bumping");
        assert_eq!(exit_code_for(&err), 1);
        assert_eq!(
            err.downcast_ref::<DevError>(),
            Some(&DevError::InvalidVersionArgument("huge".into()))
        );
    }
}
