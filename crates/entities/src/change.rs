use serde::{Deserialize, Serialize};

use crate::Bookmark;

pub const BOOKMARKS_TABLE: &str = "bookmarks";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RowKey {
    pub id: String,
}

/// A row change in the bookmarks table, as delivered to live subscribers.
///
/// `new` carries the full row for inserts and updates, `old` carries the
/// key of the affected row for updates and deletes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    #[serde(rename = "eventType")]
    pub event_type: ChangeKind,
    pub table: String,
    pub new: Option<Bookmark>,
    pub old: Option<RowKey>,
}

impl ChangeEvent {
    pub fn insert(bookmark: Bookmark) -> Self {
        Self {
            event_type: ChangeKind::Insert,
            table: String::from(BOOKMARKS_TABLE),
            new: Some(bookmark),
            old: None,
        }
    }

    pub fn update(bookmark: Bookmark) -> Self {
        let old = RowKey {
            id: bookmark.id.clone(),
        };
        Self {
            event_type: ChangeKind::Update,
            table: String::from(BOOKMARKS_TABLE),
            new: Some(bookmark),
            old: Some(old),
        }
    }

    pub fn delete(id: impl Into<String>) -> Self {
        Self {
            event_type: ChangeKind::Delete,
            table: String::from(BOOKMARKS_TABLE),
            new: None,
            old: Some(RowKey { id: id.into() }),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.new.as_ref().map(|bookmark| bookmark.user_id.as_str())
    }
}
