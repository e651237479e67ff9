//! ``src/model/library.rs``
//! ============================================================================
//! # Library: the user's downloaded and bookmarked resources
//!
//! Two independent identifier sets. Insertion order is kept so the persisted
//! lists stay stable between saves.

use indexmap::IndexSet;

use crate::model::records::RecordId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    downloads: IndexSet<RecordId>,
    bookmarks: IndexSet<RecordId>,
}

impl Library {
    #[must_use]
    pub const fn new(downloads: IndexSet<RecordId>, bookmarks: IndexSet<RecordId>) -> Self {
        Self {
            downloads,
            bookmarks,
        }
    }

    /// Returns `true` when `id` was not yet recorded.
    pub fn record_download(&mut self, id: &RecordId) -> bool {
        self.downloads.insert(id.clone())
    }

    /// Returns `true` when `id` is bookmarked after the call.
    pub fn toggle_bookmark(&mut self, id: &RecordId) -> bool {
        if self.bookmarks.shift_remove(id) {
            false
        } else {
            self.bookmarks.insert(id.clone());
            true
        }
    }

    #[must_use]
    pub fn is_downloaded(&self, id: &RecordId) -> bool {
        self.downloads.contains(id)
    }

    #[must_use]
    pub fn is_bookmarked(&self, id: &RecordId) -> bool {
        self.bookmarks.contains(id)
    }

    #[must_use]
    pub const fn downloads(&self) -> &IndexSet<RecordId> {
        &self.downloads
    }

    #[must_use]
    pub const fn bookmarks(&self) -> &IndexSet<RecordId> {
        &self.bookmarks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_recorded_once() {
        let mut library = Library::default();
        let id = RecordId::from("100");
        assert!(library.record_download(&id));
        assert!(!library.record_download(&id));
        assert_eq!(library.downloads().iter().filter(|d| **d == id).count(), 1);
    }

    #[test]
    fn bookmark_toggle_round_trips() {
        let mut library = Library::default();
        let id = RecordId::from("100");
        assert!(library.toggle_bookmark(&id));
        assert!(library.is_bookmarked(&id));
        assert!(!library.toggle_bookmark(&id));
        assert!(!library.is_bookmarked(&id));
    }

    #[test]
    fn downloads_and_bookmarks_are_independent() {
        let mut library = Library::default();
        let id = RecordId::from("7");
        library.record_download(&id);
        assert!(library.is_downloaded(&id));
        assert!(!library.is_bookmarked(&id));

        library.toggle_bookmark(&id);
        library.toggle_bookmark(&id);
        assert!(library.is_downloaded(&id));
    }
}
