//! Trigger rule-file compiler.
//!
//! Turns the line-oriented rule language into a [`TriggerSet`]:
//!
//! ```text
//! // comment
//! t1,TITLE,election
//! t2,DESCRIPTION,vote
//! t3,AFTER,3 Oct 2016 17:00:10
//! combo,OR,t1,t2
//! ADD,combo,t3
//! ```
//!
//! Names resolve in a single top-to-bottom pass: a trigger may only refer to
//! names bound on an earlier line. Rebinding a name does not touch triggers
//! that already captured the old binding. Any error rejects the whole file.
//!
//! [`TriggerSet`]: crate::trigger::TriggerSet

mod core;
mod error;


pub use self::core::{compile_config, compile_str, TriggerCompiler, ACTIVATE_KEYWORD, COMMENT_MARKER};
pub use self::error::{CompileError, Result};
