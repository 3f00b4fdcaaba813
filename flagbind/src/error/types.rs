//! Primary error enums for definition, retrieval and execution failures.

use thiserror::Error;

use super::ConfigError;
use crate::chain::Stage;
use crate::register::FieldKind;

/// Boxed error returned by lifecycle hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A defect in an option record's declaration, detected before any input
/// is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DefinitionError {
    /// The field's type is outside the bindable set.
    #[error("unsupported type `{type_name}` on field `{field}`")]
    UnsupportedKind {
        /// Declared field name.
        field: String,
        /// Type as written on the record.
        type_name: String,
    },

    /// The resolved flag name is empty.
    #[error("field `{field}` resolves to an empty flag name")]
    EmptyName {
        /// Declared field name.
        field: String,
    },

    /// The resolved alias cannot be registered.
    #[error("field `{field}` has an invalid alias `{alias}`")]
    InvalidAlias {
        /// Declared field name.
        field: String,
        /// Offending alias.
        alias: String,
    },

    /// Two fields (or a field and the command template) claim the same flag.
    #[error("flag `{flag}` on field `{field}` is already registered by {existing}")]
    DuplicateFlag {
        /// Name or alias in conflict.
        flag: String,
        /// Declared field name of the later claimant.
        field: String,
        /// Description of the earlier claimant.
        existing: String,
    },
}

/// Failure reading a value back out of the parsed flag state.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RetrievalError {
    /// No flag with this name is registered.
    #[error("flag accessed but not defined: {flag}")]
    UnknownFlag {
        /// Flag name.
        flag: String,
    },

    /// The flag holds a different value type than requested.
    #[error("trying to get {expected} value of flag `{flag}` of type {actual}")]
    TypeMismatch {
        /// Flag name.
        flag: String,
        /// Requested value type.
        expected: &'static str,
        /// Stored value type.
        actual: &'static str,
    },

    /// A raw value could not be parsed for the flag's type.
    #[error("invalid value `{value}` for flag `{flag}`: expected {expected}")]
    InvalidValue {
        /// Flag name.
        flag: String,
        /// Raw value.
        value: String,
        /// Expected value type.
        expected: &'static str,
    },

    /// The record has no storage at the descriptor's index.
    #[error("record has no field at index {index} for flag `{flag}`")]
    MissingSlot {
        /// Flag name.
        flag: String,
        /// Leaf index.
        index: usize,
    },

    /// The record's storage does not match the descriptor's kind.
    #[error("field `{field}` cannot hold a {kind} value")]
    SlotMismatch {
        /// Declared field name.
        field: String,
        /// Descriptor kind.
        kind: FieldKind,
    },

    /// clap rejected the lookup.
    #[error("failed to read flag `{flag}`: {source}")]
    Matches {
        /// Flag name.
        flag: String,
        /// Underlying clap error.
        #[source]
        source: clap::parser::MatchesError,
    },
}

/// Errors surfaced by [`BoundCommand::execute_from`](crate::BoundCommand::execute_from).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CliError {
    /// The option record is invalid.
    #[error(transparent)]
    Definition(#[from] ConfigError),

    /// The user's input was rejected by the parser.
    #[error("{0}")]
    Usage(Box<clap::Error>),

    /// A value could not be copied back into the record.
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    /// A lifecycle hook or the command body failed.
    #[error("{stage} failed: {source}")]
    Hook {
        /// Stage that failed.
        stage: Stage,
        /// Error returned by the hook.
        #[source]
        source: BoxError,
    },
}
