//! A small greeting CLI built on `flagbind`.
//!
//! Every option is a plain field on [`GreetCommand`]; the binder registers
//! the flags, applies `GREETER_*` environment fallbacks and writes parsed
//! values back before the hooks run.

pub mod error;
pub mod message;

use std::io::Write;

use flagbind::{BoxError, FlagBind, Invocation, Runnable};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::error::GreeterError;
use crate::message::Greeting;

/// Options accepted by the greeter.
#[derive(Debug, Default, FlagBind)]
pub struct GreetCommand {
    /// Who to greet.
    #[flag(usage = "Who to greet", env = "GREETER_RECIPIENT", default = "World")]
    pub recipient: String,
    /// Greeting words.
    #[flag(
        name = "salutation",
        short = "s",
        usage = "Greeting words; repeat or separate with commas"
    )]
    pub salutations: Vec<String>,
    /// Closing punctuation.
    #[flag(usage = "Closing punctuation", env = "GREETER_PUNCTUATION", default = "!")]
    pub punctuation: String,
    /// Shout the greeting.
    #[flag(usage = "Shout the greeting")]
    pub is_excited: bool,
    /// Whisper the greeting.
    #[flag(usage = "Whisper the greeting")]
    pub is_quiet: bool,
    /// Number of times to print the greeting.
    #[flag(short = "n", usage = "Print the greeting this many times", default = "1")]
    pub repeat: i64,
    /// Log filter overriding the context's level.
    #[flag(usage = "Log filter, e.g. `debug`", env = "GREETER_LOG")]
    pub log_level: Option<String>,
    greeting: Option<Greeting>,
}

impl GreetCommand {
    fn init_logging(&self, invocation: &Invocation<'_>) -> Result<(), GreeterError> {
        let filter = match &self.log_level {
            Some(level) => EnvFilter::try_new(level).map_err(|source| GreeterError::LogLevel {
                level: level.clone(),
                source,
            })?,
            None => EnvFilter::default().add_directive(invocation.context().log_level().into()),
        };
        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        if let Err(err) = installed {
            debug!(%err, "subscriber already installed");
        }
        Ok(())
    }
}

impl Runnable for GreetCommand {
    fn persistent_pre(&mut self, invocation: &Invocation<'_>) -> Result<(), BoxError> {
        self.init_logging(invocation)?;
        Ok(())
    }

    fn pre(&mut self, _: &Invocation<'_>) -> Result<(), BoxError> {
        let greeting = message::build(self).map_err(GreeterError::from)?;
        debug!(line = %greeting.line, repeat = greeting.repeat, "planned greeting");
        self.greeting = Some(greeting);
        Ok(())
    }

    fn run(&mut self, invocation: &Invocation<'_>) -> Result<(), BoxError> {
        let Some(greeting) = &self.greeting else {
            return Ok(());
        };
        let mut out = invocation.context().io().out();
        for _ in 0..greeting.repeat {
            writeln!(out, "{}", greeting.line).map_err(GreeterError::from)?;
        }
        out.flush().map_err(GreeterError::from)?;
        Ok(())
    }
}
