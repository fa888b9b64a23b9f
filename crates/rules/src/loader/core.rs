//! Core [`TriggerLoader`] struct: file-backed trigger loading with optional hot-reload.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::info;

use crate::compiler::TriggerCompiler;
use crate::trigger::TriggerSet;

use super::error::Result;
use super::watcher::handle_fs_event;

/// File-backed trigger loader with optional hot-reload.
///
/// Holds the most recent successfully compiled [`TriggerSet`] behind an
/// `RwLock<Arc<_>>`: readers clone the `Arc` and evaluate without holding
/// the lock, a reload swaps in a fresh set.
pub struct TriggerLoader {
    /// Rule file to compile.
    path: PathBuf,
    compiler: TriggerCompiler,
    /// Last good compiled set (empty until the first successful load).
    current: Arc<RwLock<Arc<TriggerSet>>>,
    /// Active filesystem watcher (held to keep it alive).
    _watcher: Option<RecommendedWatcher>,
}

impl TriggerLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            compiler: TriggerCompiler::new(),
            current: Arc::new(RwLock::new(Arc::new(TriggerSet::new()))),
            _watcher: None,
        }
    }

    /// Use `compiler` (e.g. with a custom reference zone) for every load.
    pub fn with_compiler(mut self, compiler: TriggerCompiler) -> Self {
        self.compiler = compiler;
        self
    }

    /// Read and compile the trigger file, replacing the current set.
    ///
    /// On any error the current set is left untouched.
    pub fn load(&self) -> Result<Arc<TriggerSet>> {
        let set = Arc::new(compile_file(&self.compiler, &self.path)?);
        info!(
            path = %self.path.display(),
            active = set.len(),
            definitions = set.definitions(),
            "loaded trigger file"
        );
        *self.current.write().expect("trigger set lock poisoned") = Arc::clone(&set);
        Ok(set)
    }

    /// The last successfully compiled set.
    pub fn current(&self) -> Arc<TriggerSet> {
        Arc::clone(&self.current.read().expect("trigger set lock poisoned"))
    }

    /// Shared handle to the current set, for readers that outlive the loader borrow.
    pub fn shared(&self) -> Arc<RwLock<Arc<TriggerSet>>> {
        Arc::clone(&self.current)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start a filesystem watcher with 500ms poll interval.
    ///
    /// Watches the file's parent directory so editors that replace the file
    /// are picked up. Compile errors during hot-reload are logged as warnings;
    /// the previous set is kept.
    pub fn watch(&mut self) -> Result<()> {
        let current = Arc::clone(&self.current);
        let compiler = self.compiler;
        let path = self.path.clone();

        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<notify::Event, notify::Error>| match res {
                Ok(event) => handle_fs_event(&event, &path, &compiler, &current),
                Err(e) => tracing::warn!(error = %e, "filesystem watcher error"),
            },
        )?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        let _ = watcher.configure(notify::Config::default().with_poll_interval(Duration::from_millis(500)));

        info!(path = %self.path.display(), "watching trigger file for changes");
        self._watcher = Some(watcher);
        Ok(())
    }
}

/// Read and compile one trigger file.
pub(super) fn compile_file(compiler: &TriggerCompiler, path: &Path) -> Result<TriggerSet> {
    let contents = fs::read_to_string(path)?;
    Ok(compiler.compile_str(&contents)?)
}
