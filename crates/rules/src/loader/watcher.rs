//! Filesystem event handler for the notify watcher (hot-reload).

use std::path::Path;
use std::sync::{Arc, RwLock};

use notify::{Event, EventKind};
use tracing::{info, warn};

use crate::compiler::TriggerCompiler;
use crate::trigger::TriggerSet;

use super::core::compile_file;

/// Handle a single filesystem event from the notify watcher.
///
/// Only events touching the watched file (compared by file name, since the
/// watcher reports paths under the watched directory) are considered.
pub(super) fn handle_fs_event(
    event: &Event,
    path: &Path,
    compiler: &TriggerCompiler,
    current: &Arc<RwLock<Arc<TriggerSet>>>,
) {
    let Some(file_name) = path.file_name() else {
        return;
    };
    if !event.paths.iter().any(|p| p.file_name() == Some(file_name)) {
        return;
    }

    match &event.kind {
        EventKind::Create(_) | EventKind::Modify(_) => match compile_file(compiler, path) {
            Ok(set) => {
                info!(
                    path = %path.display(),
                    active = set.len(),
                    "hot-reloaded trigger file"
                );
                *current.write().expect("trigger set lock poisoned") = Arc::new(set);
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to reload trigger file, keeping previous version"
                );
            }
        },
        EventKind::Remove(_) => {
            warn!(path = %path.display(), "trigger file removed, keeping previous version");
        }
        _ => {}
    }
}
