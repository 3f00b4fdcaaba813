//! Binds the fields of an option record to command-line flags.
//!
//! A record describes its fields through the [`FlagBind`] trait, normally
//! via `#[derive(FlagBind)]`. Building a [`BoundCommand`] validates the
//! record, registers one clap argument per exported field, and on every
//! execution copies parsed values (with environment-variable fallbacks)
//! back into the record before the lifecycle hooks run.
//!
//! ```rust,no_run
//! use flagbind::{BoundCommand, BoxError, FlagBind, Invocation, Runnable};
//!
//! #[derive(Default, FlagBind)]
//! struct BuildCommand {
//!     #[flag(usage = "Target architecture", env = "BUILD_ARCH", default = "x86_64")]
//!     pub arch: String,
//!     #[flag(short = "j")]
//!     pub jobs: i64,
//! }
//!
//! impl Runnable for BuildCommand {
//!     fn run(&mut self, _invocation: &Invocation<'_>) -> Result<(), BoxError> {
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> std::process::ExitCode {
//!     flagbind::main(BoundCommand::builder(BuildCommand::default()).build())
//! }
//! ```

pub use flagbind_macros::FlagBind;

pub mod chain;
pub mod command;
pub mod context;
mod error;
pub mod extract;
pub mod field;
pub mod flags;
pub mod naming;
pub mod overlay;
pub mod register;
pub mod writeback;

use clap::ArgMatches;

pub use chain::{HookChain, Invocation, Runnable, Stage};
pub use command::{BoundCommand, CommandBuilder, FlagErrorHandler, main};
pub use context::{CliOption, CliOptions, Context, IoStreams, contextualize};
pub use error::{
    BoxError, CliError, ConfigError, DefinitionError, RetrievalError, is_display_request,
};
pub use field::{FieldEntry, FieldShape, FieldSpec, MapSlot, Slot, Tags};
pub use flags::{FlagSet, FlagValue};
pub use overlay::{Environment, ProcessEnv};
pub use register::{DefaultValue, FieldDescriptor, FieldKind, Scope};

/// An option record whose fields can be bound to flags.
///
/// Leaf indices are assigned depth first over [`FlagBind::fields`]:
/// every leaf counts, embedded or not, exported or not. [`FlagBind::slot`]
/// must agree with that numbering.
pub trait FlagBind {
    /// Type name, used for the default command name and in errors.
    const TYPE_NAME: &'static str;

    /// Number of leaves, embedded ones included.
    const FIELD_COUNT: usize;

    /// The record's field table in declaration order.
    fn fields() -> Vec<FieldEntry>;

    /// Storage for the leaf at `index`, or `None` when out of range.
    fn slot(&mut self, index: usize) -> Option<Slot<'_>>;
}

/// Applies environment fallbacks and writes parsed values into `record`.
///
/// For callers that parse with their own command and only need the
/// binding half. `descriptors` must come from [`register::descriptors`]
/// and must have been registered on the command that produced `matches`.
///
/// # Errors
///
/// Returns a [`RetrievalError`] when `matches` disagrees with the
/// descriptors or a value cannot be written back.
pub fn bind<T: FlagBind>(
    record: &mut T,
    descriptors: &[FieldDescriptor],
    matches: &ArgMatches,
    env: &dyn Environment,
) -> Result<(), RetrievalError> {
    let mut flags = FlagSet::from_matches(descriptors, matches)?;
    overlay::apply(&mut flags, descriptors, env);
    writeback::write_back(record, &flags, descriptors)
}
