//! In-process hierarchy store backed by a tokio [`Mutex`].

use std::future::Future;

use tokio::sync::Mutex;

use homestead_domain::hierarchy::Hierarchy;

use crate::ports::HierarchyStore;

/// Keeps the whole hierarchy in memory behind a single lock.
///
/// Readers and writers are serialized alike. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryHierarchyStore {
    inner: Mutex<Hierarchy>,
}

impl InMemoryHierarchyStore {
    /// Create a store holding an empty hierarchy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with an existing hierarchy.
    #[must_use]
    pub fn with_hierarchy(hierarchy: Hierarchy) -> Self {
        Self {
            inner: Mutex::new(hierarchy),
        }
    }
}

impl HierarchyStore for InMemoryHierarchyStore {
    fn read<F, T>(&self, f: F) -> impl Future<Output = T> + Send
    where
        F: FnOnce(&Hierarchy) -> T + Send,
        T: Send,
    {
        async move {
            let guard = self.inner.lock().await;
            f(&guard)
        }
    }

    fn write<F, T>(&self, f: F) -> impl Future<Output = T> + Send
    where
        F: FnOnce(&mut Hierarchy) -> T + Send,
        T: Send,
    {
        async move {
            let mut guard = self.inner.lock().await;
            f(&mut guard)
        }
    }
}
