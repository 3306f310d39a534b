//! Per-client filter registry.

use parking_lot::Mutex;

/// Filters created by one client, in creation order.
///
/// Used only for bulk teardown; filters never consult it.
pub struct FilterRegistry<F> {
    filters: Mutex<Vec<F>>,
}

impl<F> Default for FilterRegistry<F> {
    fn default() -> Self {
        Self {
            filters: Mutex::new(Vec::new()),
        }
    }
}

impl<F: Clone> FilterRegistry<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, filter: F) {
        self.filters.lock().push(filter);
    }

    pub fn snapshot(&self) -> Vec<F> {
        self.filters.lock().clone()
    }

    /// Remove and return every registered filter.
    pub fn drain(&self) -> Vec<F> {
        std::mem::take(&mut *self.filters.lock())
    }

    pub fn len(&self) -> usize {
        self.filters.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.lock().is_empty()
    }
}
