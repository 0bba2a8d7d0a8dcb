//! Persistence seams for bookmarks and the review list.
//!
//! The grading core never touches storage; front ends hand these traits a
//! backend. [`MemoryStore`] backs tests and throwaway sessions.

use std::collections::BTreeSet;
use std::sync::Mutex;

use crate::error::StoreError;
use crate::session::ReviewItem;

/// Storage for bookmarked question ids.
pub trait BookmarkStore {
    fn load(&self) -> Result<BTreeSet<String>, StoreError>;
    fn save(&self, ids: &BTreeSet<String>) -> Result<(), StoreError>;
}

/// Storage for the review list handed from a finished quiz to review.
pub trait ReviewStore {
    fn load(&self) -> Result<Vec<ReviewItem>, StoreError>;
    fn save(&self, items: &[ReviewItem]) -> Result<(), StoreError>;
}

/// In-process store; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bookmarks: Mutex<BTreeSet<String>>,
    review: Mutex<Vec<ReviewItem>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookmarkStore for MemoryStore {
    fn load(&self) -> Result<BTreeSet<String>, StoreError> {
        Ok(lock(&self.bookmarks).clone())
    }

    fn save(&self, ids: &BTreeSet<String>) -> Result<(), StoreError> {
        *lock(&self.bookmarks) = ids.clone();
        Ok(())
    }
}

impl ReviewStore for MemoryStore {
    fn load(&self) -> Result<Vec<ReviewItem>, StoreError> {
        Ok(lock(&self.review).clone())
    }

    fn save(&self, items: &[ReviewItem]) -> Result<(), StoreError> {
        *lock(&self.review) = items.to_vec();
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Bookmark set kept in sync with a [`BookmarkStore`].
///
/// Every change is written through immediately.
#[derive(Debug)]
pub struct Bookmarks<S> {
    store: S,
    ids: BTreeSet<String>,
}

impl<S: BookmarkStore> Bookmarks<S> {
    /// Load the current set from `store`.
    ///
    /// A store that cannot be read starts empty; the failure is logged.
    pub fn open(store: S) -> Self {
        let ids = match store.load() {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load bookmarks, starting empty");
                BTreeSet::new()
            }
        };
        Self { store, ids }
    }

    /// Add or remove `id`. Returns whether it is bookmarked afterwards.
    ///
    /// The in-memory set only changes once the store accepted the write.
    pub fn toggle(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut ids = self.ids.clone();
        let now_bookmarked = if ids.remove(id) {
            false
        } else {
            ids.insert(id.to_string());
            true
        };
        self.store.save(&ids)?;
        self.ids = ids;
        tracing::debug!(question = id, bookmarked = now_bookmarked, "bookmark toggled");
        Ok(now_bookmarked)
    }

    pub fn is_bookmarked(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }

    /// Bookmarked ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
