//! Records and helpers shared by the integration tests.

use std::collections::{BTreeMap, HashMap};

use flagbind::{BoundCommand, BoxError, CliError, FlagBind, Invocation, Runnable};

/// A record exercising every bindable kind.
#[derive(Debug, Default, FlagBind)]
pub struct PushCommand {
    #[flag(usage = "Image tag", env = "PUSH_TAG,IMAGE_TAG", default = "latest")]
    pub tag: String,
    #[flag(short = "j", default = "4")]
    pub jobs: i64,
    pub force: bool,
    #[flag(name = "label", short = "l")]
    pub labels: Vec<String>,
    #[flag(split = false)]
    pub args: Vec<String>,
    pub annotations: BTreeMap<String, String>,
    pub headers: HashMap<String, String>,
    pub limit: Option<i64>,
    #[flag(env = "PUSH_NOTE", default = "none")]
    pub note: Option<String>,
    pub dry_run: Option<bool>,
    pub(crate) positional: Vec<String>,
}

impl PushCommand {
    /// Positional arguments seen by the last run.
    pub fn positional(&self) -> &[String] {
        &self.positional
    }
}

impl Runnable for PushCommand {
    fn run(&mut self, invocation: &Invocation<'_>) -> Result<(), BoxError> {
        self.positional = invocation.args().to_vec();
        Ok(())
    }
}

/// Environment lookup backed by fixed pairs.
pub fn fixed_env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + Send + Sync + use<> {
    let vars: BTreeMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |name: &str| vars.get(name).cloned()
}

/// Builds a command for `record`, executes it with `args` and the given
/// environment, and returns the record.
pub fn execute<T: Runnable>(
    record: T,
    args: &[&str],
    env: &[(&str, &str)],
) -> Result<T, CliError> {
    let mut command = BoundCommand::builder(record)
        .environment(fixed_env(env))
        .build()?;
    command.execute_from(std::iter::once("prog").chain(args.iter().copied()))?;
    Ok(command.into_record())
}

/// [`execute`] with an empty environment.
pub fn parse<T: Runnable>(record: T, args: &[&str]) -> Result<T, CliError> {
    execute(record, args, &[])
}
