//! Environment-variable fallbacks applied over the parsed flags.
//!
//! A variable only replaces a flag whose current value is empty or equal to
//! its declared default. Only string-valued flags are considered; for any
//! other kind the string lookup fails and the variable is skipped.

use tracing::debug;

use crate::flags::FlagSet;
use crate::register::FieldDescriptor;

/// Source of environment-variable values.
pub trait Environment {
    /// Returns the value of `name`, if set.
    fn var(&self, name: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<F> Environment for F
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Reconciles `env` against `flags` for every descriptor with fallbacks.
///
/// All declared variable names are checked in order. Once a variable has
/// been applied the flag no longer equals its default, so later names only
/// win when the earlier ones are unset or empty.
pub fn apply(flags: &mut FlagSet, descriptors: &[FieldDescriptor], env: &dyn Environment) {
    for descriptor in descriptors {
        for var in &descriptor.env {
            let Some(value) = env.var(var).filter(|v| !v.is_empty()) else {
                continue;
            };
            let Ok(current) = flags.get_string(&descriptor.name) else {
                continue;
            };
            if !(current.is_empty() || current == descriptor.default_literal) {
                continue;
            }
            match flags.set(&descriptor.name, &value) {
                Ok(()) => debug!(flag = %descriptor.name, var = %var, "applied environment fallback"),
                Err(err) => debug!(flag = %descriptor.name, var = %var, %err, "environment fallback rejected"),
            }
        }
    }
}
