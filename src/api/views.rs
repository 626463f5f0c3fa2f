//! Response shapes that decorate stored entities with derived fields.

use serde::Serialize;

use crate::models::{Note, Notebook, Tag};
use crate::store::Store;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotebookView {
    #[serde(flatten)]
    pub notebook: Notebook,
    pub note_count: usize,
}

impl NotebookView {
    pub fn build(store: &Store, notebook: Notebook) -> Self {
        let note_count = store.get_notes(Some(notebook.id)).len();
        Self {
            notebook,
            note_count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagView {
    #[serde(flatten)]
    pub tag: Tag,
    pub note_count: usize,
}

impl TagView {
    pub fn build(store: &Store, tag: Tag) -> Self {
        let note_count = store.get_note_ids_by_tag(tag.id).len();
        Self { tag, note_count }
    }
}

/// A note, optionally with its tags attached
#[derive(Debug, Serialize)]
pub struct NoteView {
    #[serde(flatten)]
    pub note: Note,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl NoteView {
    pub fn bare(note: Note) -> Self {
        Self { note, tags: None }
    }

    pub fn with_tags(store: &Store, note: Note) -> Self {
        let tags = store.get_note_tags(note.id);
        Self {
            note,
            tags: Some(tags),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RenderedNote {
    pub id: i64,
    pub html: String,
}
