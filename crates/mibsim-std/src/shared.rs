//! Shared registry handle with atomic reload.
//!
//! Readers take cheap `Arc` snapshots and keep using them for as long as
//! they like; reload builds a replacement registry elsewhere and swaps the
//! pointer under a short write lock. A snapshot taken before a swap stays
//! internally consistent forever.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use mibsim_core::registry::Registry;

/// Swappable shared handle to the current registry.
#[derive(Debug, Default)]
pub struct SharedRegistry {
    current: RwLock<Arc<Registry>>,
}

impl SharedRegistry {
    /// Start with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already-built registry.
    #[must_use]
    pub fn from_registry(registry: Registry) -> Self {
        Self {
            current: RwLock::new(Arc::new(registry)),
        }
    }

    /// The current registry. The snapshot is immutable and survives any
    /// number of subsequent swaps.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Registry> {
        Arc::clone(&self.current.read())
    }

    /// Replace the current registry wholesale.
    pub fn swap(&self, replacement: Registry) {
        let status = replacement.status();
        *self.current.write() = Arc::new(replacement);
        info!(
            loaded = status.loaded,
            failed = status.failed,
            "registry swapped"
        );
    }
}
