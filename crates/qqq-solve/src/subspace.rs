//! Keyed storage for multigrid subspaces that outlive a single solver.

use std::collections::HashMap;

/// Named-object store holding opaque subspace handles.
pub trait SubspaceCache {
    /// Handle type stored under each id.
    type Handle;

    /// Returns the handle stored under `id`.
    fn get(&self, id: &str) -> Option<Self::Handle>;

    /// Stores `handle` under `id`, replacing any previous entry.
    fn put(&mut self, id: &str, handle: Self::Handle);

    /// Removes and returns the handle stored under `id`.
    fn remove(&mut self, id: &str) -> Option<Self::Handle>;
}

/// In-process [`SubspaceCache`].
#[derive(Debug, Clone)]
pub struct MemorySubspaceCache<H> {
    entries: HashMap<String, H>,
}

impl<H> Default for MemorySubspaceCache<H> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<H> MemorySubspaceCache<H> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is stored.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of stored subspaces.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H: Clone> SubspaceCache for MemorySubspaceCache<H> {
    type Handle = H;

    fn get(&self, id: &str) -> Option<H> {
        self.entries.get(id).cloned()
    }

    fn put(&mut self, id: &str, handle: H) {
        self.entries.insert(id.to_string(), handle);
    }

    fn remove(&mut self, id: &str) -> Option<H> {
        self.entries.remove(id)
    }
}
