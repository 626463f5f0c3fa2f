//! Free-text search over notes and the search history log.

use crate::models::{NewSearchHistoryItem, Note, SearchHistoryItem};
use crate::store::Store;

impl Store {
    /// Notes whose title or content contains `query`, ignoring case.
    ///
    /// A blank query matches nothing. Results come back in insertion order.
    pub fn search_notes(&self, query: &str) -> Vec<Note> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.notes
            .values()
            .filter(|note| {
                note.title.to_lowercase().contains(&needle)
                    || note.content.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Record a query, replacing any earlier entry for the same query
    /// (case-insensitive) so each query appears once, at its latest use.
    pub fn add_search_history(&mut self, item: NewSearchHistoryItem) -> SearchHistoryItem {
        let query = item.query.to_lowercase();
        self.search_history
            .retain(|_, existing| existing.query.to_lowercase() != query);

        let id = self.next_search_history_id();
        let created_at = self.now();
        let entry = SearchHistoryItem {
            id,
            query: item.query,
            created_at,
        };
        self.search_history.insert(id, entry.clone());
        entry
    }

    /// The full history, newest first
    pub fn get_search_history(&self) -> Vec<SearchHistoryItem> {
        let mut items: Vec<SearchHistoryItem> = self.search_history.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items
    }

    /// Drop every history entry, returning how many were removed
    pub fn clear_search_history(&mut self) -> usize {
        let removed = self.search_history.len();
        self.search_history.clear();
        removed
    }
}
