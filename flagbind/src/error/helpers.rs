//! Helpers for classifying parser errors.

use clap::{Error as ClapError, error::ErrorKind};

use super::CliError;

/// Returns `true` when a [`clap::Error`] corresponds to `--help` or
/// `--version`.
///
/// Clap surfaces these requests as errors; entry points print them and exit
/// successfully.
#[must_use]
pub fn is_display_request(err: &ClapError) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    )
}

impl CliError {
    /// Returns `true` for help and version output wrapped as a usage error.
    #[must_use]
    pub fn is_display_request(&self) -> bool {
        matches!(self, Self::Usage(err) if is_display_request(err))
    }
}
