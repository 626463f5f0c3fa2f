pub mod api;
pub mod cli;
pub mod config;
pub mod markdown;
pub mod models;
pub mod search;
pub mod seed;
pub mod store;
pub mod utils;

pub use config::Config;
pub use models::{Note, NoteTag, Notebook, SearchHistoryItem, Tag};
pub use store::Store;
pub use utils::Profile;
