//! Error types for the trigger file loader.

use crate::compiler::CompileError;

/// Errors that can occur while loading or watching a trigger file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file was read but did not compile.
    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    /// Filesystem watcher error.
    #[error("Notify watcher error: {0}")]
    Notify(#[from] notify::Error),
}

/// Result alias for loader operations.
pub type Result<T> = std::result::Result<T, LoadError>;
