//! News item alerting triggers.
//!
//! This crate provides:
//! - Phrase matching over lower-cased, punctuation-free word sequences
//! - Title/description phrase triggers and before/after time triggers
//! - NOT/AND/OR combinators held in an index-based arena
//! - A compiler for the line-oriented trigger rule language
//! - A trigger file loader with hot-reload via `notify` watcher
//! - The batch filter pipeline (sequential and rayon-parallel)

mod fuzzy;

pub mod compiler;
pub mod filter;
pub mod loader;
pub mod phrase;
pub mod trigger;

pub use compiler::{compile_config, compile_str, CompileError, TriggerCompiler};
pub use filter::{
    filter, filter_with_report, par_filter, par_filter_with_report, FailedItem, FilterReport,
};
pub use loader::{LoadError, TriggerLoader};
pub use phrase::contains_phrase;
pub use trigger::{EvalError, Phrase, Trigger, TriggerId, TriggerKind, TriggerSet};
