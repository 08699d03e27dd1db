use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// URLs a fetch has been issued for. Entries are never removed.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        VisitedSet::default()
    }

    /// Check-and-insert under one lock. Returns false when `url` was
    /// already present, meaning somebody else owns its fetch.
    pub fn insert(&self, url: &str) -> bool {
        let mut urls = self.lock();
        if urls.contains(url) {
            return false;
        }
        urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains(url)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    // A panicking holder can't leave the set half-written, so keep going.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
