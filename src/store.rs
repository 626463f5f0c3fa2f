use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Duration, Utc};

use crate::models::{
    DEFAULT_NOTEBOOK_ICON, NewNote, NewNotebook, NewTag, Note, NoteTag, NoteUpdate, Notebook,
    NotebookUpdate, SearchHistoryItem, Tag, TagUpdate,
};

/// Per-entity id counters. Ids start at 1 and are never handed out twice.
#[derive(Debug, Clone)]
struct IdCounters {
    notebook: i64,
    note: i64,
    tag: i64,
    note_tag: i64,
    search_history: i64,
}

impl Default for IdCounters {
    fn default() -> Self {
        Self {
            notebook: 1,
            note: 1,
            tag: 1,
            note_tag: 1,
            search_history: 1,
        }
    }
}

fn next_id(counter: &mut i64) -> i64 {
    let id = *counter;
    *counter += 1;
    id
}

/// In-memory store holding every notebook, note, tag, note/tag association
/// and search history entry for the lifetime of the process.
///
/// Tables are keyed by id, so iteration order is insertion order. Lookups
/// through the association table are linear scans.
#[derive(Debug, Clone, Default)]
pub struct Store {
    notebooks: BTreeMap<i64, Notebook>,
    pub(crate) notes: BTreeMap<i64, Note>,
    tags: BTreeMap<i64, Tag>,
    note_tags: BTreeMap<i64, NoteTag>,
    pub(crate) search_history: BTreeMap<i64, SearchHistoryItem>,
    ids: IdCounters,
    last_timestamp: Option<DateTime<Utc>>,
}

impl Store {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time, strictly later than any timestamp this store handed out before
    pub(crate) fn now(&mut self) -> DateTime<Utc> {
        let mut now = Utc::now();
        if let Some(last) = self.last_timestamp {
            if now <= last {
                now = last + Duration::microseconds(1);
            }
        }
        self.last_timestamp = Some(now);
        now
    }

    pub(crate) fn next_search_history_id(&mut self) -> i64 {
        next_id(&mut self.ids.search_history)
    }

    // Notebooks

    pub fn get_notebooks(&self) -> Vec<Notebook> {
        self.notebooks.values().cloned().collect()
    }

    pub fn get_notebook(&self, id: i64) -> Option<Notebook> {
        self.notebooks.get(&id).cloned()
    }

    pub fn create_notebook(&mut self, notebook: NewNotebook) -> Notebook {
        let id = next_id(&mut self.ids.notebook);
        let created_at = self.now();
        let notebook = Notebook {
            id,
            name: notebook.name,
            icon: notebook
                .icon
                .unwrap_or_else(|| DEFAULT_NOTEBOOK_ICON.to_string()),
            created_at,
        };
        self.notebooks.insert(id, notebook.clone());
        notebook
    }

    /// Merge the provided fields over an existing notebook
    pub fn update_notebook(&mut self, id: i64, update: NotebookUpdate) -> Option<Notebook> {
        let notebook = self.notebooks.get_mut(&id)?;
        if let Some(name) = update.name {
            notebook.name = name;
        }
        if let Some(icon) = update.icon {
            notebook.icon = icon;
        }
        Some(notebook.clone())
    }

    /// Remove a notebook. Notes that reference it keep their `notebook_id`.
    pub fn delete_notebook(&mut self, id: i64) -> bool {
        self.notebooks.remove(&id).is_some()
    }

    // Notes

    /// All notes, or those in one notebook, most recently updated first
    pub fn get_notes(&self, notebook_id: Option<i64>) -> Vec<Note> {
        let mut notes: Vec<Note> = self
            .notes
            .values()
            .filter(|note| notebook_id.is_none() || note.notebook_id == notebook_id)
            .cloned()
            .collect();
        // Stable sort: equal timestamps keep insertion order
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        notes
    }

    pub fn get_note(&self, id: i64) -> Option<Note> {
        self.notes.get(&id).cloned()
    }

    pub fn create_note(&mut self, note: NewNote) -> Note {
        let id = next_id(&mut self.ids.note);
        let now = self.now();
        let note = Note {
            id,
            title: note.title,
            content: note.content,
            notebook_id: note.notebook_id,
            is_pinned: note.is_pinned.unwrap_or(false),
            created_at: now,
            updated_at: now,
        };
        self.notes.insert(id, note.clone());
        note
    }

    /// Merge the provided fields over an existing note. `updated_at` is
    /// refreshed even when nothing else changes.
    pub fn update_note(&mut self, id: i64, update: NoteUpdate) -> Option<Note> {
        if !self.notes.contains_key(&id) {
            return None;
        }
        let now = self.now();
        let note = self.notes.get_mut(&id)?;
        if let Some(title) = update.title {
            note.title = title;
        }
        if let Some(content) = update.content {
            note.content = content;
        }
        if let Some(notebook_id) = update.notebook_id {
            note.notebook_id = notebook_id;
        }
        if let Some(is_pinned) = update.is_pinned {
            note.is_pinned = is_pinned;
        }
        note.updated_at = now;
        Some(note.clone())
    }

    /// Remove a note together with all of its tag associations
    pub fn delete_note(&mut self, id: i64) -> bool {
        let before = self.note_tags.len();
        self.note_tags.retain(|_, nt| nt.note_id != id);
        let removed = before - self.note_tags.len();
        if removed > 0 {
            tracing::debug!(note_id = id, removed, "Dropped tag associations of note");
        }
        self.notes.remove(&id).is_some()
    }

    // Tags

    pub fn get_tags(&self) -> Vec<Tag> {
        self.tags.values().cloned().collect()
    }

    pub fn get_tag(&self, id: i64) -> Option<Tag> {
        self.tags.get(&id).cloned()
    }

    /// Case-insensitive exact lookup by name
    pub fn get_tag_by_name(&self, name: &str) -> Option<Tag> {
        let wanted = name.to_lowercase();
        self.tags
            .values()
            .find(|tag| tag.name.to_lowercase() == wanted)
            .cloned()
    }

    /// Get-or-create: returns the existing tag when one matches `name`
    /// case-insensitively.
    pub fn create_tag(&mut self, tag: NewTag) -> Tag {
        if let Some(existing) = self.get_tag_by_name(&tag.name) {
            return existing;
        }
        let id = next_id(&mut self.ids.tag);
        let created_at = self.now();
        let tag = Tag {
            id,
            name: tag.name,
            created_at,
        };
        self.tags.insert(id, tag.clone());
        tag
    }

    pub fn update_tag(&mut self, id: i64, update: TagUpdate) -> Option<Tag> {
        let tag = self.tags.get_mut(&id)?;
        if let Some(name) = update.name {
            tag.name = name;
        }
        Some(tag.clone())
    }

    /// Remove a tag together with all of its note associations
    pub fn delete_tag(&mut self, id: i64) -> bool {
        let before = self.note_tags.len();
        self.note_tags.retain(|_, nt| nt.tag_id != id);
        let removed = before - self.note_tags.len();
        if removed > 0 {
            tracing::debug!(tag_id = id, removed, "Dropped note associations of tag");
        }
        self.tags.remove(&id).is_some()
    }

    // Note tags

    /// Tags linked to a note, in association order. Associations pointing
    /// at a missing tag are skipped.
    pub fn get_note_tags(&self, note_id: i64) -> Vec<Tag> {
        self.note_tags
            .values()
            .filter(|nt| nt.note_id == note_id)
            .filter_map(|nt| self.tags.get(&nt.tag_id).cloned())
            .collect()
    }

    pub fn get_note_ids_by_tag(&self, tag_id: i64) -> Vec<i64> {
        self.note_tags
            .values()
            .filter(|nt| nt.tag_id == tag_id)
            .map(|nt| nt.note_id)
            .collect()
    }

    /// Link a tag to a note. Linking an already linked pair returns the
    /// existing association.
    pub fn add_tag_to_note(&mut self, note_id: i64, tag_id: i64) -> NoteTag {
        if let Some(existing) = self
            .note_tags
            .values()
            .find(|nt| nt.note_id == note_id && nt.tag_id == tag_id)
        {
            return existing.clone();
        }
        let id = next_id(&mut self.ids.note_tag);
        let note_tag = NoteTag {
            id,
            note_id,
            tag_id,
        };
        self.note_tags.insert(id, note_tag.clone());
        note_tag
    }

    pub fn remove_tag_from_note(&mut self, note_id: i64, tag_id: i64) -> bool {
        let found = self
            .note_tags
            .values()
            .find(|nt| nt.note_id == note_id && nt.tag_id == tag_id)
            .map(|nt| nt.id);
        match found {
            Some(id) => self.note_tags.remove(&id).is_some(),
            None => false,
        }
    }

    /// Converge the tags linked to `note_id` onto exactly `names`.
    ///
    /// Links to tags whose name is not in `names` are removed (the tags
    /// themselves stay); each missing name is resolved or created and then
    /// linked. Names compare case-insensitively. Returns the note's tags
    /// afterwards.
    pub fn set_note_tags<S: AsRef<str>>(&mut self, note_id: i64, names: &[S]) -> Vec<Tag> {
        let wanted: HashSet<String> = names
            .iter()
            .map(|name| name.as_ref().to_lowercase())
            .collect();

        let current = self.get_note_tags(note_id);
        for tag in &current {
            if !wanted.contains(&tag.name.to_lowercase()) {
                self.remove_tag_from_note(note_id, tag.id);
            }
        }

        let mut linked: HashSet<String> = current
            .iter()
            .map(|tag| tag.name.to_lowercase())
            .filter(|name| wanted.contains(name))
            .collect();
        for name in names {
            let name = name.as_ref();
            if !linked.insert(name.to_lowercase()) {
                continue;
            }
            let tag = self.create_tag(NewTag::new(name));
            self.add_tag_to_note(note_id, tag.id);
        }

        self.get_note_tags(note_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tags: &[Tag]) -> Vec<&str> {
        tags.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn create_notebook_assigns_fresh_ids_and_default_icon() {
        let mut store = Store::new();
        let work = store.create_notebook(NewNotebook::new("Work"));
        let home = store.create_notebook(NewNotebook {
            name: "Home".to_string(),
            icon: Some("house".to_string()),
        });

        assert_eq!(work.id, 1);
        assert_eq!(home.id, 2);
        assert_eq!(work.icon, "folder");
        assert_eq!(home.icon, "house");

        let all = store.get_notebooks();
        assert_eq!(all.iter().filter(|n| n.name == "Work").count(), 1);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn update_notebook_merges_fields() {
        let mut store = Store::new();
        let nb = store.create_notebook(NewNotebook::new("Work"));

        let updated = store
            .update_notebook(
                nb.id,
                NotebookUpdate {
                    icon: Some("briefcase".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Work");
        assert_eq!(updated.icon, "briefcase");
        assert_eq!(updated.created_at, nb.created_at);

        assert!(store.update_notebook(99, NotebookUpdate::default()).is_none());
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut store = Store::new();
        let first = store.create_notebook(NewNotebook::new("A"));
        assert!(store.delete_notebook(first.id));
        assert!(!store.delete_notebook(first.id));
        let second = store.create_notebook(NewNotebook::new("B"));
        assert_eq!(second.id, first.id + 1);
    }

    #[test]
    fn deleting_notebook_leaves_notes_dangling() {
        let mut store = Store::new();
        let nb = store.create_notebook(NewNotebook::new("Work"));
        let note = store.create_note(NewNote::new("T", "hello").in_notebook(nb.id));

        assert!(store.delete_notebook(nb.id));

        let kept = store.get_note(note.id).unwrap();
        assert_eq!(kept.notebook_id, Some(nb.id));
        assert_eq!(store.get_notes(Some(nb.id)).len(), 1);
    }

    #[test]
    fn update_note_refreshes_updated_at() {
        let mut store = Store::new();
        let note = store.create_note(NewNote::new("a", "b"));
        assert_eq!(note.created_at, note.updated_at);
        assert!(!note.is_pinned);

        let updated = store
            .update_note(
                note.id,
                NoteUpdate {
                    title: Some("x".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.title, "x");
        assert_eq!(updated.content, "b");
        assert!(updated.updated_at > note.updated_at);
        assert_eq!(updated.created_at, note.created_at);

        let touched = store.update_note(note.id, NoteUpdate::default()).unwrap();
        assert!(touched.updated_at > updated.updated_at);
    }

    #[test]
    fn update_note_can_detach_from_notebook() {
        let mut store = Store::new();
        let note = store.create_note(NewNote::new("a", "b").in_notebook(4));
        let updated = store
            .update_note(
                note.id,
                NoteUpdate {
                    notebook_id: Some(None),
                    is_pinned: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.notebook_id, None);
        assert!(updated.is_pinned);
    }

    #[test]
    fn update_missing_note_is_none() {
        let mut store = Store::new();
        assert!(store.update_note(1, NoteUpdate::default()).is_none());
    }

    #[test]
    fn get_notes_orders_by_most_recent_update() {
        let mut store = Store::new();
        let a = store.create_note(NewNote::new("A", ""));
        let b = store.create_note(NewNote::new("B", ""));

        let ids: Vec<i64> = store.get_notes(None).iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);

        store.update_note(a.id, NoteUpdate::default());
        let ids: Vec<i64> = store.get_notes(None).iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[test]
    fn get_notes_filters_by_notebook() {
        let mut store = Store::new();
        store.create_note(NewNote::new("one", "").in_notebook(1));
        store.create_note(NewNote::new("two", "").in_notebook(2));
        store.create_note(NewNote::new("loose", ""));

        let in_one = store.get_notes(Some(1));
        assert_eq!(in_one.len(), 1);
        assert_eq!(in_one[0].title, "one");
        assert_eq!(store.get_notes(None).len(), 3);
    }

    #[test]
    fn create_tag_is_case_insensitive_get_or_create() {
        let mut store = Store::new();
        let foo = store.create_tag(NewTag::new("Foo"));
        let again = store.create_tag(NewTag::new("foo"));
        assert_eq!(foo.id, again.id);
        assert_eq!(again.name, "Foo");
        assert_eq!(store.get_tags().len(), 1);
        assert_eq!(store.get_tag_by_name("FOO").map(|t| t.id), Some(foo.id));
        assert!(store.get_tag_by_name("fo").is_none());
    }

    #[test]
    fn add_tag_to_note_is_idempotent() {
        let mut store = Store::new();
        let note = store.create_note(NewNote::new("n", ""));
        let tag = store.create_tag(NewTag::new("t"));

        let first = store.add_tag_to_note(note.id, tag.id);
        let second = store.add_tag_to_note(note.id, tag.id);
        assert_eq!(first, second);
        assert_eq!(store.get_note_tags(note.id).len(), 1);
    }

    #[test]
    fn remove_tag_from_note_reports_presence() {
        let mut store = Store::new();
        let note = store.create_note(NewNote::new("n", ""));
        let tag = store.create_tag(NewTag::new("t"));
        store.add_tag_to_note(note.id, tag.id);

        assert!(store.remove_tag_from_note(note.id, tag.id));
        assert!(!store.remove_tag_from_note(note.id, tag.id));
        assert!(store.get_note_tags(note.id).is_empty());
        assert!(store.get_tag(tag.id).is_some());
    }

    #[test]
    fn delete_note_cascades_to_associations() {
        let mut store = Store::new();
        let note = store.create_note(NewNote::new("n", ""));
        let other = store.create_note(NewNote::new("o", ""));
        let tag = store.create_tag(NewTag::new("t"));
        store.add_tag_to_note(note.id, tag.id);
        store.add_tag_to_note(other.id, tag.id);

        assert!(store.delete_note(note.id));
        assert!(!store.delete_note(note.id));
        assert!(store.get_note_tags(note.id).is_empty());
        assert_eq!(store.get_note_ids_by_tag(tag.id), vec![other.id]);
    }

    #[test]
    fn delete_tag_cascades_to_associations() {
        let mut store = Store::new();
        let note = store.create_note(NewNote::new("n", ""));
        let keep = store.create_tag(NewTag::new("keep"));
        let gone = store.create_tag(NewTag::new("gone"));
        store.add_tag_to_note(note.id, keep.id);
        store.add_tag_to_note(note.id, gone.id);

        assert!(store.delete_tag(gone.id));
        assert!(store.get_note_ids_by_tag(gone.id).is_empty());
        assert_eq!(names(&store.get_note_tags(note.id)), vec!["keep"]);
    }

    #[test]
    fn set_note_tags_converges_and_keeps_tag_entities() {
        let mut store = Store::new();
        let work = store.create_notebook(NewNotebook::new("Work"));
        let note = store.create_note(NewNote::new("T", "hello").in_notebook(work.id));

        let tags = store.set_note_tags(note.id, &["a", "b"]);
        assert_eq!(names(&tags), vec!["a", "b"]);

        let tags = store.set_note_tags(note.id, &["b", "c"]);
        let mut got = names(&tags);
        got.sort();
        assert_eq!(got, vec!["b", "c"]);
        assert!(store.get_tag_by_name("a").is_some());
    }

    #[test]
    fn set_note_tags_ignores_case_and_duplicates() {
        let mut store = Store::new();
        let note = store.create_note(NewNote::new("T", ""));
        let before = store.set_note_tags(note.id, &["Rust"]);

        let after = store.set_note_tags(note.id, &["rust", "RUST", "cli"]);
        assert_eq!(names(&after), vec!["Rust", "cli"]);
        assert_eq!(after[0].id, before[0].id);
        assert_eq!(store.get_tags().len(), 2);

        assert!(store.set_note_tags::<&str>(note.id, &[]).is_empty());
    }

    #[test]
    fn timestamps_are_strictly_increasing() {
        let mut store = Store::new();
        let mut last = store.now();
        for _ in 0..100 {
            let next = store.now();
            assert!(next > last);
            last = next;
        }
    }
}
