use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::Mutex;

use crate::foundation::error::FilekitResult;

/// Per-path single-flight guard for lazy generation.
///
/// Concurrent callers for the same path serialize on one slot; whoever gets the slot re-checks
/// `is_done` before generating, so a derivative is produced at most once per miss.
#[derive(Debug, Default)]
pub(crate) struct GenerationGate {
    slots: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl GenerationGate {
    /// Run `generate` unless `is_done` already holds once the slot for `path` is acquired.
    ///
    /// Returns `true` if this call generated.
    pub(crate) fn run_once<D, G>(&self, path: &Path, is_done: D, generate: G) -> FilekitResult<bool>
    where
        D: FnOnce() -> bool,
        G: FnOnce() -> FilekitResult<()>,
    {
        let slot = self
            .slots
            .lock()
            .entry(path.to_path_buf())
            .or_default()
            .clone();

        let result = {
            let _held = slot.lock();
            if is_done() {
                tracing::debug!(path = %path.display(), "generated by a concurrent caller");
                Ok(false)
            } else {
                generate().map(|()| true)
            }
        };

        let mut slots = self.slots.lock();
        // Only the map and this call still hold the slot: nobody is waiting on it.
        if Arc::strong_count(&slot) == 2 {
            slots.remove(path);
        }
        result
    }

    #[cfg(test)]
    pub(crate) fn pending(&self) -> usize {
        self.slots.lock().len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kit/gate.rs"]
mod tests;
