//! Helpers for safely mutating environment variables in tests.
//!
//! Every mutation takes a global re-entrant mutex and returns a guard that
//! restores the previous value (or removes the variable) when dropped.
//! Guards for the same key restore in LIFO order. Hold an [`EnvScope`] when
//! a test needs the environment to stay put across several operations, such
//! as building and executing a command that reads fallbacks.
//!
//! # Examples
//!
//! ```
//! use flagbind_test_helpers::env;
//!
//! let _scope = env::scope_with(|lock| vec![lock.set_var("BUILD_ARCH", "arm64")]);
//! assert_eq!(std::env::var("BUILD_ARCH").ok().as_deref(), Some("arm64"));
//! ```

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

type EnvLockGuard = ReentrantMutexGuard<'static, ()>;

/// Applies `mutate` to `key` while `_held` proves the lock is taken,
/// recording the prior value for restoration.
fn mutate_locked(key: String, _held: &EnvLockGuard, mutate: impl FnOnce(&str)) -> EnvVarGuard {
    let original = env::var_os(&key);
    mutate(&key);
    EnvVarGuard { key, original }
}

fn write_var(key: &str, value: &OsStr) {
    // SAFETY: callers hold `ENV_MUTEX`, so no other helper touches the
    // environment concurrently.
    unsafe { env::set_var(key, value) };
}

fn clear_var(key: &str) {
    // SAFETY: as for `write_var`.
    unsafe { env::remove_var(key) };
}

/// RAII guard restoring an environment variable to its prior value on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _held = ENV_MUTEX.lock();
        match self.original.take() {
            Some(value) => write_var(&self.key, &value),
            None => clear_var(&self.key),
        }
    }
}

/// Holds the environment lock; mutations made through it do not re-lock.
#[must_use = "dropping releases the environment lock"]
pub struct EnvVarLock {
    guard: EnvLockGuard,
}

impl EnvVarLock {
    /// Sets `key` to `value`.
    pub fn set_var(&self, key: impl Into<String>, value: impl AsRef<OsStr>) -> EnvVarGuard {
        mutate_locked(key.into(), &self.guard, |k| write_var(k, value.as_ref()))
    }

    /// Removes `key`.
    pub fn remove_var(&self, key: impl Into<String>) -> EnvVarGuard {
        mutate_locked(key.into(), &self.guard, clear_var)
    }
}

/// Keeps the environment lock and a set of guards alive together.
///
/// Guards are restored before the lock is released.
#[must_use = "dropping releases the environment lock and restores guards"]
pub struct EnvScope {
    guards: Vec<EnvVarGuard>,
    _lock: EnvVarLock,
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        drop(std::mem::take(&mut self.guards));
    }
}

/// Sets an environment variable and returns a guard restoring its prior value.
///
/// # Examples
/// ```
/// use flagbind_test_helpers::env;
/// let _g = env::set_var("GREETER_NAME", "Ada");
/// assert_eq!(std::env::var("GREETER_NAME").ok().as_deref(), Some("Ada"));
/// ```
pub fn set_var(key: impl Into<String>, value: impl AsRef<OsStr>) -> EnvVarGuard {
    let held = ENV_MUTEX.lock();
    mutate_locked(key.into(), &held, |k| write_var(k, value.as_ref()))
}

/// Removes an environment variable and returns a guard restoring its prior value.
///
/// # Examples
/// ```
/// use flagbind_test_helpers::env;
/// let _g = env::remove_var("GREETER_NAME");
/// assert!(std::env::var("GREETER_NAME").is_err());
/// ```
pub fn remove_var(key: impl Into<String>) -> EnvVarGuard {
    let held = ENV_MUTEX.lock();
    mutate_locked(key.into(), &held, clear_var)
}

/// Acquires the global environment lock for the lifetime of the guard.
pub fn lock() -> EnvVarLock {
    EnvVarLock {
        guard: ENV_MUTEX.lock(),
    }
}

/// Builds a scope while holding the lock.
///
/// Builders should mutate through the provided lock rather than the free
/// functions.
pub fn scope_with<F>(builder: F) -> EnvScope
where
    F: FnOnce(&EnvVarLock) -> Vec<EnvVarGuard>,
{
    let held = lock();
    let guards = builder(&held);
    EnvScope {
        guards,
        _lock: held,
    }
}

/// Sets every pair and removes every name in `unset`, holding the lock until
/// the scope drops.
///
/// # Examples
/// ```
/// use flagbind_test_helpers::env;
///
/// let _scope = env::vars(&[("IMAGE_TAG", "v2")], &["TAG"]);
/// assert!(std::env::var("TAG").is_err());
/// ```
pub fn vars(pairs: &[(&str, &str)], unset: &[&str]) -> EnvScope {
    scope_with(|held| {
        pairs
            .iter()
            .map(|(key, value)| held.set_var(*key, value))
            .chain(unset.iter().map(|key| held.remove_var(*key)))
            .collect()
    })
}

#[cfg(test)]
mod tests;
