//! Conversions from external error types into [`CliError`].

use super::CliError;

impl From<clap::Error> for CliError {
    fn from(e: clap::Error) -> Self {
        Self::Usage(Box::new(e))
    }
}
