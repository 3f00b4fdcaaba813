//! Lifecycle hooks and the fixed chain that runs them.
//!
//! A [`HookChain`] is built once per command. Every execution walks the
//! same stages: environment overlay, write-back steps, then the record's
//! lifecycle hooks and body. A failing stage stops the chain.

use std::fmt;

use clap::ArgMatches;
use tracing::debug;

use crate::FlagBind;
use crate::context::Context;
use crate::error::{BoxError, CliError};
use crate::flags::FlagSet;
use crate::overlay::{self, Environment};
use crate::register::FieldDescriptor;
use crate::writeback::Step;

/// An option record with lifecycle hooks.
///
/// `persistent_pre` and `pre` default to no-ops. All hooks observe the
/// record after write-back.
pub trait Runnable: FlagBind {
    /// Runs before [`Runnable::pre`].
    ///
    /// # Errors
    ///
    /// Any error aborts the invocation.
    fn persistent_pre(&mut self, _invocation: &Invocation<'_>) -> Result<(), BoxError> {
        Ok(())
    }

    /// Runs before [`Runnable::run`].
    ///
    /// # Errors
    ///
    /// Any error aborts the invocation.
    fn pre(&mut self, _invocation: &Invocation<'_>) -> Result<(), BoxError> {
        Ok(())
    }

    /// The command body.
    ///
    /// # Errors
    ///
    /// Returned errors surface as [`CliError::Hook`].
    fn run(&mut self, invocation: &Invocation<'_>) -> Result<(), BoxError>;
}

/// What a hook sees of the current invocation.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    args: &'a [String],
    matches: &'a ArgMatches,
    context: &'a Context,
}

impl<'a> Invocation<'a> {
    /// Bundles the parts of one invocation.
    #[must_use]
    pub const fn new(args: &'a [String], matches: &'a ArgMatches, context: &'a Context) -> Self {
        Self {
            args,
            matches,
            context,
        }
    }

    /// Free positional arguments.
    #[must_use]
    pub const fn args(&self) -> &'a [String] {
        self.args
    }

    /// Raw parser output.
    #[must_use]
    pub const fn matches(&self) -> &'a ArgMatches {
        self.matches
    }

    /// Cross-cutting collaborators.
    #[must_use]
    pub const fn context(&self) -> &'a Context {
        self.context
    }
}

/// One stage of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Environment-variable fallbacks.
    EnvironmentOverlay,
    /// A write-back step.
    WriteBack(Step),
    /// [`Runnable::persistent_pre`].
    PersistentPre,
    /// [`Runnable::pre`].
    Pre,
    /// [`Runnable::run`].
    Run,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvironmentOverlay => f.write_str("environment overlay"),
            Self::WriteBack(step) => step.fmt(f),
            Self::PersistentPre => f.write_str("persistent pre-run"),
            Self::Pre => f.write_str("pre-run"),
            Self::Run => f.write_str("run"),
        }
    }
}

/// Ordered, immutable list of stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookChain {
    stages: Box<[Stage]>,
}

impl Default for HookChain {
    fn default() -> Self {
        Self::new()
    }
}

impl HookChain {
    /// The standard chain: overlay, every write-back step, hooks, body.
    #[must_use]
    pub fn new() -> Self {
        let stages = std::iter::once(Stage::EnvironmentOverlay)
            .chain(Step::ORDER.into_iter().map(Stage::WriteBack))
            .chain([Stage::PersistentPre, Stage::Pre, Stage::Run])
            .collect();
        Self { stages }
    }

    /// Stages in execution order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Runs every stage against `record`.
    ///
    /// # Errors
    ///
    /// Returns the first failure; later stages do not run.
    pub fn execute<T: Runnable>(
        &self,
        record: &mut T,
        flags: &mut FlagSet,
        descriptors: &[FieldDescriptor],
        env: &dyn Environment,
        invocation: &Invocation<'_>,
    ) -> Result<(), CliError> {
        for stage in self.stages.iter().copied() {
            debug!(%stage, "running stage");
            match stage {
                Stage::EnvironmentOverlay => overlay::apply(flags, descriptors, env),
                Stage::WriteBack(step) => step.run(record, flags, descriptors)?,
                Stage::PersistentPre => record
                    .persistent_pre(invocation)
                    .map_err(|source| CliError::Hook { stage, source })?,
                Stage::Pre => record
                    .pre(invocation)
                    .map_err(|source| CliError::Hook { stage, source })?,
                Stage::Run => record
                    .run(invocation)
                    .map_err(|source| CliError::Hook { stage, source })?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_precedes_write_back_which_precedes_hooks() {
        let chain = HookChain::new();
        let stages = chain.stages();
        assert_eq!(stages.first(), Some(&Stage::EnvironmentOverlay));
        let write_back: Vec<_> = stages
            .iter()
            .filter_map(|s| match s {
                Stage::WriteBack(step) => Some(*step),
                _ => None,
            })
            .collect();
        assert_eq!(write_back, Step::ORDER);
        assert_eq!(
            stages.get(stages.len() - 3..),
            Some(&[Stage::PersistentPre, Stage::Pre, Stage::Run][..])
        );
    }

    #[test]
    fn stages_render_for_errors() {
        assert_eq!(Stage::Run.to_string(), "run");
        assert_eq!(
            Stage::WriteBack(Step::Mapping).to_string(),
            "mapping write-back"
        );
    }
}
