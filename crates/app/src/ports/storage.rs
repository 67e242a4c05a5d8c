//! Storage port — serialized access to the ownership hierarchy.

use std::future::Future;
use std::sync::Arc;

use homestead_domain::hierarchy::Hierarchy;

/// Holds the process-wide [`Hierarchy`] and hands it out one caller at a time.
///
/// Each call runs its closure inside the store's critical section, so no
/// caller ever observes a cascading delete or a re-link half done. Closures
/// must not block.
pub trait HierarchyStore {
    /// Run `f` with shared access to the hierarchy.
    fn read<F, T>(&self, f: F) -> impl Future<Output = T> + Send
    where
        F: FnOnce(&Hierarchy) -> T + Send,
        T: Send;

    /// Run `f` with exclusive access to the hierarchy.
    fn write<F, T>(&self, f: F) -> impl Future<Output = T> + Send
    where
        F: FnOnce(&mut Hierarchy) -> T + Send,
        T: Send;
}

impl<S: HierarchyStore + Send + Sync> HierarchyStore for Arc<S> {
    fn read<F, T>(&self, f: F) -> impl Future<Output = T> + Send
    where
        F: FnOnce(&Hierarchy) -> T + Send,
        T: Send,
    {
        (**self).read(f)
    }

    fn write<F, T>(&self, f: F) -> impl Future<Output = T> + Send
    where
        F: FnOnce(&mut Hierarchy) -> T + Send,
        T: Send,
    {
        (**self).write(f)
    }
}
