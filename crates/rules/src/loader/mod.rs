//! Trigger file loader with hot-reload via `notify` watcher.
//!
//! Reads the rule file from disk, compiles it all-or-nothing and keeps the
//! last good [`TriggerSet`](crate::trigger::TriggerSet) available to readers.
//! When watching, a modified file is recompiled; a file that no longer
//! compiles is reported and the previous set stays in place.

mod core;
mod error;
mod watcher;


pub use self::core::TriggerLoader;
pub use self::error::{LoadError, Result};
