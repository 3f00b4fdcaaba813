//! Command objects binding an option record to a clap command.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Command;
use tracing::debug;

use crate::chain::{HookChain, Invocation, Runnable};
use crate::context::{CliOption, Context, contextualize};
use crate::error::{CliError, ConfigError};
use crate::flags::FlagSet;
use crate::naming::command_name;
use crate::overlay::{Environment, ProcessEnv};
use crate::register::{self, FieldDescriptor, POSITIONAL_ID};

/// Turns a clap parse failure into the error returned by
/// [`BoundCommand::execute_from`].
pub type FlagErrorHandler = Arc<dyn Fn(clap::Error) -> CliError + Send + Sync>;

/// Builder for a [`BoundCommand`].
pub struct CommandBuilder<T> {
    record: T,
    template: Command,
    options: Vec<CliOption>,
    on_flag_error: FlagErrorHandler,
    env: Arc<dyn Environment + Send + Sync>,
}

impl<T: Runnable> CommandBuilder<T> {
    /// Uses `template` for name, help text and any pre-declared arguments.
    #[must_use]
    pub fn template(mut self, template: Command) -> Self {
        self.template = template;
        self
    }

    /// Adds a context option applied on every invocation.
    #[must_use]
    pub fn option(mut self, option: CliOption) -> Self {
        self.options.push(option);
        self
    }

    /// Replaces the handler for clap parse failures.
    #[must_use]
    pub fn flag_error_handler(
        mut self,
        handler: impl Fn(clap::Error) -> CliError + Send + Sync + 'static,
    ) -> Self {
        self.on_flag_error = Arc::new(handler);
        self
    }

    /// Replaces the source of environment fallbacks.
    #[must_use]
    pub fn environment(mut self, env: impl Environment + Send + Sync + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Validates the record and registers its flags.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] listing every invalid field; no flag is
    /// registered in that case.
    pub fn build(self) -> Result<BoundCommand<T>, ConfigError> {
        let mut template = self.template;
        if template.get_name().is_empty() {
            let name = command_name::<T>();
            let usage = format!("{name} [SUBCOMMAND] [FLAGS]");
            template = template.name(name).override_usage(usage);
        }
        let descriptors = register::descriptors::<T>(&template)?;
        let command = register::register(template, &descriptors);
        debug!(
            command = command.get_name(),
            flags = descriptors.len(),
            "built command"
        );
        Ok(BoundCommand {
            record: self.record,
            command,
            descriptors,
            chain: HookChain::new(),
            options: self.options,
            on_flag_error: self.on_flag_error,
            env: self.env,
        })
    }
}

/// An option record bound to a clap command.
pub struct BoundCommand<T> {
    record: T,
    command: Command,
    descriptors: Vec<FieldDescriptor>,
    chain: HookChain,
    options: Vec<CliOption>,
    on_flag_error: FlagErrorHandler,
    env: Arc<dyn Environment + Send + Sync>,
}

impl<T: Runnable> BoundCommand<T> {
    /// Starts building a command for `record`.
    ///
    /// On every execution, integer, string and boolean fields are
    /// overwritten with the parsed value or their declared default.
    /// Sequence, mapping and optional fields keep their current value
    /// unless a flag or environment variable supplies one.
    #[must_use]
    pub fn builder(record: T) -> CommandBuilder<T> {
        CommandBuilder {
            record,
            template: Command::new(""),
            options: Vec::new(),
            on_flag_error: Arc::new(<CliError as From<clap::Error>>::from),
            env: Arc::new(ProcessEnv),
        }
    }

    /// The bound record.
    #[must_use]
    pub const fn record(&self) -> &T {
        &self.record
    }

    /// Consumes the command, returning the record.
    #[must_use]
    pub fn into_record(self) -> T {
        self.record
    }

    /// The registered clap command.
    #[must_use]
    pub const fn command(&self) -> &Command {
        &self.command
    }

    /// Validated descriptors in declaration order.
    #[must_use]
    pub const fn descriptors(&self) -> &[FieldDescriptor] {
        self.descriptors.as_slice()
    }

    /// Parses `args` (program name first) and runs the hook chain.
    ///
    /// # Errors
    ///
    /// Parse failures pass through the flag-error handler; retrieval and
    /// hook failures surface as [`CliError`].
    pub fn execute_from<I, A>(&mut self, args: I) -> Result<(), CliError>
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(args)
            .map_err(|err| (self.on_flag_error)(err))?;
        let mut flags = FlagSet::from_matches(&self.descriptors, &matches)?;
        let positional: Vec<String> = matches
            .try_get_many::<String>(POSITIONAL_ID)
            .ok()
            .flatten()
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        let context = contextualize(&self.options);
        let invocation = Invocation::new(&positional, &matches, &context);
        self.chain.execute(
            &mut self.record,
            &mut flags,
            &self.descriptors,
            self.env.as_ref(),
            &invocation,
        )
    }

    /// Executes with `args` and reports the outcome as an exit code.
    ///
    /// Errors are written to the context's output stream. Help and version
    /// requests count as success.
    pub fn main_from<I, A>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString> + Clone,
    {
        match self.execute_from(args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => report(&contextualize(&self.options), &err),
        }
    }
}

/// Runs a built command against the process arguments.
///
/// A definition error from building is reported the same way as an
/// execution error.
#[must_use]
pub fn main<T: Runnable>(command: Result<BoundCommand<T>, ConfigError>) -> ExitCode {
    match command {
        Ok(mut bound) => bound.main_from(std::env::args_os()),
        Err(err) => report(&contextualize(&[]), &CliError::from(err)),
    }
}

fn report(context: &Context, err: &CliError) -> ExitCode {
    let mut out = context.io().out();
    if writeln!(out, "{err}").is_err() {
        debug!(%err, "failed to report error");
    }
    if err.is_display_request() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
