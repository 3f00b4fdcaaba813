//! Cross-cutting collaborators handed to lifecycle hooks.
//!
//! Process-wide defaults are computed once and cloned for each invocation;
//! per-command [`CliOption`]s are then applied over the clone.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, OnceLock};

use camino::Utf8PathBuf;
use parking_lot::{Mutex, MutexGuard};
use tracing::level_filters::LevelFilter;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Output and error streams shared by every clone of a context.
#[derive(Clone)]
pub struct IoStreams {
    out: SharedWriter,
    err: SharedWriter,
}

impl IoStreams {
    /// Wraps the given writers.
    pub fn new(out: impl Write + Send + 'static, err: impl Write + Send + 'static) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(out))),
            err: Arc::new(Mutex::new(Box::new(err))),
        }
    }

    /// The process's standard output and standard error.
    #[must_use]
    pub fn system() -> Self {
        Self::new(io::stdout(), io::stderr())
    }

    /// Locks the output stream.
    pub fn out(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.out.lock()
    }

    /// Locks the error stream.
    pub fn err(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.err.lock()
    }
}

impl fmt::Debug for IoStreams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IoStreams").finish_non_exhaustive()
    }
}

/// Values a context is assembled from.
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    /// Streams for user-facing output.
    pub io: Option<IoStreams>,
    /// Requested log verbosity.
    pub log_level: Option<LevelFilter>,
    /// Directory holding the program's configuration.
    pub config_dir: Option<Utf8PathBuf>,
}

/// A reusable adjustment to [`CliOptions`].
pub type CliOption = Arc<dyn Fn(&mut CliOptions) + Send + Sync>;

/// Replaces the I/O streams.
#[must_use]
pub fn with_io_streams(io: IoStreams) -> CliOption {
    Arc::new(move |opts: &mut CliOptions| opts.io = Some(io.clone()))
}

/// Replaces the log level.
#[must_use]
pub fn with_log_level(level: LevelFilter) -> CliOption {
    Arc::new(move |opts: &mut CliOptions| opts.log_level = Some(level))
}

/// Replaces the configuration directory.
#[must_use]
pub fn with_config_dir(dir: impl Into<Utf8PathBuf>) -> CliOption {
    let path = dir.into();
    Arc::new(move |opts: &mut CliOptions| opts.config_dir = Some(path.clone()))
}

/// Sets the I/O streams unless already set.
#[must_use]
pub fn with_default_io_streams() -> CliOption {
    Arc::new(|opts: &mut CliOptions| {
        opts.io.get_or_insert_with(IoStreams::system);
    })
}

/// Sets the log level to `INFO` unless already set.
#[must_use]
pub fn with_default_log_level() -> CliOption {
    Arc::new(|opts: &mut CliOptions| {
        opts.log_level.get_or_insert(LevelFilter::INFO);
    })
}

/// Sets the platform configuration directory unless already set.
///
/// Leaves the field empty when the platform has none or its path is not
/// UTF-8.
#[must_use]
pub fn with_default_config_dir() -> CliOption {
    Arc::new(|opts: &mut CliOptions| {
        if opts.config_dir.is_none() {
            opts.config_dir = dirs::config_dir().and_then(|p| Utf8PathBuf::from_path_buf(p).ok());
        }
    })
}

impl CliOptions {
    /// Applies `options` in order.
    pub fn apply(&mut self, options: &[CliOption]) {
        for option in options {
            option(self);
        }
    }

    /// Process-wide defaults, computed on first use.
    pub fn defaults() -> &'static Self {
        static DEFAULTS: OnceLock<CliOptions> = OnceLock::new();
        DEFAULTS.get_or_init(|| {
            let mut opts = Self::default();
            opts.apply(&[
                with_default_io_streams(),
                with_default_log_level(),
                with_default_config_dir(),
            ]);
            opts
        })
    }
}

/// Resolved collaborators for one invocation.
#[derive(Debug, Clone)]
pub struct Context {
    io: IoStreams,
    log_level: LevelFilter,
    config_dir: Option<Utf8PathBuf>,
}

impl Context {
    /// Streams for user-facing output.
    #[must_use]
    pub const fn io(&self) -> &IoStreams {
        &self.io
    }

    /// Requested log verbosity.
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    /// Configuration directory, when one is known.
    #[must_use]
    pub fn config_dir(&self) -> Option<&camino::Utf8Path> {
        self.config_dir.as_deref()
    }
}

impl From<CliOptions> for Context {
    fn from(opts: CliOptions) -> Self {
        Self {
            io: opts.io.unwrap_or_else(IoStreams::system),
            log_level: opts.log_level.unwrap_or(LevelFilter::INFO),
            config_dir: opts.config_dir,
        }
    }
}

/// Builds a context from the cached defaults with `options` applied on top.
#[must_use]
pub fn contextualize(options: &[CliOption]) -> Context {
    let mut opts = CliOptions::defaults().clone();
    opts.apply(options);
    Context::from(opts)
}
