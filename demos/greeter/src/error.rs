//! Error types for the greeter demo.
//!
//! Validation failures are raised from the pre-run hook so nothing is
//! printed for an invalid request.

use thiserror::Error;

/// Errors raised by the greeter.
#[derive(Debug, Error)]
pub enum GreeterError {
    /// The request failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The requested log filter does not parse.
    #[error("invalid log level `{level}`: {source}")]
    LogLevel {
        /// Filter as supplied.
        level: String,
        /// Parser failure.
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    /// Writing the greeting failed.
    #[error("failed to write greeting: {0}")]
    Output(#[from] std::io::Error),
}

/// Problems with the greeting request itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The recipient is blank.
    #[error("recipient must contain visible characters")]
    BlankRecipient,
    /// A salutation collapsed to nothing after trimming.
    #[error("salutations must contain visible characters (index {0})")]
    BlankSalutation(usize),
    /// Both delivery modes were requested.
    #[error("cannot combine --is-excited with --is-quiet")]
    ConflictingDeliveryModes,
    /// Repeat count below one.
    #[error("repeat count must be at least 1, got {0}")]
    RepeatOutOfRange(i64),
}
