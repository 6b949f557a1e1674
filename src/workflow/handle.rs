//! Transient handles to rendered artifacts.
//!
//! A handle is the native stand-in for a browser object URL: it names an
//! artifact held in the registry until the handle is released. Release happens
//! exactly once per handle, either through `release()` or on drop.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use super::artifact::Artifact;

/// Acquire/release counters. `live == acquired - released` at all times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandleStats {
    pub acquired: u64,
    pub released: u64,
}

impl HandleStats {
    pub fn live(&self) -> u64 {
        self.acquired - self.released
    }
}

#[derive(Default)]
struct RegistryState {
    live: HashMap<String, Arc<Artifact>>,
    stats: HandleStats,
}

/// Shared table of live artifacts, addressed by URL.
#[derive(Clone, Default)]
pub struct ObjectUrlRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, artifact: Artifact) -> BlobHandle {
        let url = format!("blob:invoice-draft/{}", Uuid::new_v4());
        let artifact = Arc::new(artifact);

        let mut state = self.state.lock();
        state.live.insert(url.clone(), artifact.clone());
        state.stats.acquired += 1;
        log::debug!(
            "created {} ({} bytes, {} live)",
            url,
            artifact.size_bytes(),
            state.stats.live()
        );
        drop(state);

        BlobHandle {
            url,
            artifact,
            registry: self.clone(),
        }
    }

    pub fn resolve(&self, url: &str) -> Option<Arc<Artifact>> {
        self.state.lock().live.get(url).cloned()
    }

    pub fn stats(&self) -> HandleStats {
        self.state.lock().stats
    }

    fn revoke(&self, url: &str) {
        let mut state = self.state.lock();
        if state.live.remove(url).is_some() {
            state.stats.released += 1;
            log::debug!("revoked {} ({} live)", url, state.stats.live());
        }
    }
}

impl fmt::Debug for ObjectUrlRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectUrlRegistry")
            .field("stats", &self.stats())
            .finish()
    }
}

/// Owned reference to a live artifact.
pub struct BlobHandle {
    url: String,
    artifact: Arc<Artifact>,
    registry: ObjectUrlRegistry,
}

/// The handle shown inline before download.
pub type PreviewHandle = BlobHandle;

impl BlobHandle {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    pub fn release(self) {
        drop(self);
    }
}

impl Drop for BlobHandle {
    fn drop(&mut self) {
        self.registry.revoke(&self.url);
    }
}

impl fmt::Debug for BlobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobHandle")
            .field("url", &self.url)
            .field("kind", &self.artifact.kind)
            .field("size_bytes", &self.artifact.size_bytes())
            .finish()
    }
}

/// Holds at most one preview. Replacing releases the previous handle first;
/// dropping the slot releases whatever it holds.
#[derive(Debug, Default)]
pub struct PreviewSlot {
    current: Option<PreviewHandle>,
}

impl PreviewSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, handle: PreviewHandle) {
        if let Some(previous) = self.current.take() {
            previous.release();
        }
        self.current = Some(handle);
    }

    /// Release the current preview. Returns whether there was one.
    pub fn dismiss(&mut self) -> bool {
        match self.current.take() {
            Some(handle) => {
                handle.release();
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<&PreviewHandle> {
        self.current.as_ref()
    }

    pub fn is_live(&self) -> bool {
        self.current.is_some()
    }
}
