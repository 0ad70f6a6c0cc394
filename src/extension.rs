//! The single extension hook point used during translation: event
//! `GUEST_PATH`, fired from `Translator::translate` before
//! canonicalization. The full plugin mechanism (additional events,
//! dynamic loading) is out of scope; only this hook point is modeled.

use crate::errors::Result;
use std::path::{Path, PathBuf};

/// Implemented by extension hooks registered on a [`Tracee`](crate::tracee::Tracee).
///
/// Must be `Send + Sync`: tracee contexts may run on different threads
/// concurrently, so any mutable state a hook carries is the hook's own
/// responsibility to synchronize.
pub trait Extension: Send + Sync {
    /// Called with the in-progress translation result buffer and the
    /// original fake path. Returning `Ok(true)` means the hook already
    /// wrote a host path into `result` and canonicalization/binding
    /// substitution must be skipped; `Ok(false)` means the hook declines
    /// and the engine proceeds normally. `Err` propagates to the caller.
    fn on_guest_path(&self, result: &mut PathBuf, fake_path: &Path) -> Result<bool>;
}

/// Process-wide set of registered hooks, passed explicitly through the
/// tracee context rather than kept as ambient global state so that tests
/// can instantiate isolated engines.
#[derive(Default)]
pub struct ExtensionRegistry {
    hooks: Vec<Box<dyn Extension>>,
}

impl ExtensionRegistry {
    pub fn new() -> ExtensionRegistry {
        ExtensionRegistry { hooks: Vec::new() }
    }

    pub fn register(&mut self, hook: Box<dyn Extension>) {
        self.hooks.push(hook);
    }

    /// Fires the `GUEST_PATH` event. Returns `Ok(true)` as soon as a hook
    /// short-circuits the translation.
    pub fn guest_path(&self, result: &mut PathBuf, fake_path: &Path) -> Result<bool> {
        for hook in &self.hooks {
            if hook.on_guest_path(result, fake_path)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
