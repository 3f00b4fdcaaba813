//! Test helpers shared across the flagbind workspace.
//!
//! [`env`] serialises process-environment mutation for tests that exercise
//! environment fallbacks; [`io`] captures what a command writes to its
//! output streams.

pub mod env;
pub mod io;
