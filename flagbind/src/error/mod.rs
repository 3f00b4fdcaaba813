//! Error types produced while building and executing bound commands.

mod aggregate;
mod conversions;
mod helpers;
mod types;

pub use aggregate::ConfigError;
pub use helpers::is_display_request;
pub use types::{BoxError, CliError, DefinitionError, RetrievalError};

#[cfg(test)]
mod tests;
