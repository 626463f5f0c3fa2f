//! Demo data for a freshly started store.

use crate::models::{NewNote, NewNotebook, NewSearchHistoryItem, NewTag};
use crate::store::Store;

const PIANO_STORE_CONTENT: &str = "## Check this

- [ ] Create website
- [x] Get a logo - done!
- [ ] Check online payment services
- [ ] Setup a few ads
- [x] Schedule meeting with agency

## Meetings this week

| Day | Topic | Notes |
|-----|-------|-------|
| Tue 8 June | Meeting with supplier - ask about that discount | [MeetingNotes.pdf](link) |
| Thu 10 June | Interior design meeting | |

## Poster ideas";

impl Store {
    /// A store pre-populated with a few notebooks, tagged notes and past searches
    pub fn with_demo_data() -> Self {
        let mut store = Store::new();
        store.seed_demo_data();
        store
    }

    /// Add the demo notebooks, tags, notes and search history to this store
    pub fn seed_demo_data(&mut self) {
        let personal = self.create_notebook(NewNotebook::new("Personal"));
        let work = self.create_notebook(NewNotebook::new("Work"));
        let projects = self.create_notebook(NewNotebook::new("Projects"));

        let piano = self.create_tag(NewTag::new("piano"));
        let store_tag = self.create_tag(NewTag::new("store"));
        let car = self.create_tag(NewTag::new("car"));
        self.create_tag(NewTag::new("jelly"));

        let piano_idea = self.create_note(
            NewNote::new("Vintage Piano Store Idea", PIANO_STORE_CONTENT).in_notebook(personal.id),
        );
        let barn_call = self.create_note(
            NewNote::new(
                "Barn conference call",
                "Notes from the conference call with barn suppliers...",
            )
            .in_notebook(work.id),
        );
        self.create_note(
            NewNote::new(
                "Hire accountant",
                "Need to hire an accountant for the business...",
            )
            .in_notebook(personal.id),
        );
        let deploy = self.create_note(
            NewNote::new(
                "Deploy website",
                "Steps to deploy the website to production server...",
            )
            .in_notebook(projects.id),
        );

        self.add_tag_to_note(piano_idea.id, piano.id);
        self.add_tag_to_note(piano_idea.id, store_tag.id);
        self.add_tag_to_note(deploy.id, store_tag.id);
        self.add_tag_to_note(barn_call.id, car.id);

        for query in ["meeting notes", "piano store", "website design"] {
            self.add_search_history(NewSearchHistoryItem::new(query));
        }

        tracing::debug!("Seeded store with demo data");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_store_has_expected_shape() {
        let store = Store::with_demo_data();
        assert_eq!(store.get_notebooks().len(), 3);
        assert_eq!(store.get_tags().len(), 4);
        assert_eq!(store.get_notes(None).len(), 4);

        let history: Vec<String> = store
            .get_search_history()
            .into_iter()
            .map(|h| h.query)
            .collect();
        assert_eq!(history, vec!["website design", "piano store", "meeting notes"]);
    }

    #[test]
    fn demo_tags_are_linked() {
        let store = Store::with_demo_data();
        let store_tag = store.get_tag_by_name("store").unwrap();
        let mut ids = store.get_note_ids_by_tag(store_tag.id);
        ids.sort();
        assert_eq!(ids, vec![1, 4]);

        let jelly = store.get_tag_by_name("jelly").unwrap();
        assert!(store.get_note_ids_by_tag(jelly.id).is_empty());
    }

    #[test]
    fn demo_content_is_searchable() {
        let store = Store::with_demo_data();
        let hits = store.search_notes("PIANO");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Vintage Piano Store Idea");
        assert_eq!(store.get_notes(Some(1)).len(), 2);
    }
}
