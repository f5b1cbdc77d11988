//! Bookmark list kept in sync with the server.
//!
//! The list is loaded once, then patched from the live change stream.
//! Deletes are applied locally before the server confirms them and rolled
//! back if the server refuses.
//!
//! Events are pulled with [`BookmarkList::next_event`] by whoever owns the
//! list, so an event never lands while a delete is in flight. Anything that
//! arrived in the meantime is applied after the delete settles: a remote
//! DELETE for a row we just restored removes it again.

use std::{fmt, sync::Arc};

use entities::{Bookmark, ChangeEvent, ChangeKind, User};
use futures::StreamExt;

use crate::session::{ChangeStream, SessionClient};

pub struct BookmarkList<C: SessionClient + ?Sized> {
    client: Arc<C>,
    user_id: String,
    bookmarks: Vec<Bookmark>,
    loading: bool,
    changes: Option<ChangeStream>,
}

#[derive(Debug)]
pub struct DeleteError {
    pub id: String,
    pub message: String,
}

impl fmt::Display for DeleteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to delete: {}", self.message)
    }
}

impl std::error::Error for DeleteError {}

impl<C: SessionClient + ?Sized> BookmarkList<C> {
    pub fn new(client: Arc<C>, user: &User) -> Self {
        Self {
            client,
            user_id: user.id.clone(),
            bookmarks: Vec::new(),
            loading: true,
            changes: None,
        }
    }

    /// Subscribes, then loads the current rows. Subscribing first means no
    /// change made during the initial fetch is lost; replays are harmless
    /// because inserts are de-duplicated by id.
    pub async fn mount(&mut self) -> anyhow::Result<()> {
        self.changes = Some(self.client.subscribe().await?);

        let fetched = self.client.list_bookmarks().await;
        self.loading = false;
        self.bookmarks = fetched?;
        Ok(())
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_subscribed(&self) -> bool {
        self.changes.is_some()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.bookmarks.iter().position(|bookmark| bookmark.id == id)
    }

    /// Applies one change event. Returns whether the list changed.
    pub fn apply(&mut self, event: ChangeEvent) -> bool {
        match event.event_type {
            ChangeKind::Insert => match event.new {
                Some(bookmark) if bookmark.user_id == self.user_id => {
                    match self.position(&bookmark.id) {
                        Some(index) => self.bookmarks[index] = bookmark,
                        None => self.bookmarks.insert(0, bookmark),
                    }
                    true
                }
                _ => false,
            },
            ChangeKind::Update => match event.new {
                Some(bookmark) if bookmark.user_id == self.user_id => {
                    match self.position(&bookmark.id) {
                        Some(index) => {
                            self.bookmarks[index] = bookmark;
                            true
                        }
                        None => false,
                    }
                }
                _ => false,
            },
            ChangeKind::Delete => match event.old {
                Some(key) => {
                    let before = self.bookmarks.len();
                    self.bookmarks.retain(|bookmark| bookmark.id != key.id);
                    self.bookmarks.len() != before
                }
                None => false,
            },
        }
    }

    /// Waits for the next change and applies it. `Ok(false)` once the
    /// subscription has ended or was never opened.
    pub async fn next_event(&mut self) -> anyhow::Result<bool> {
        let Some(changes) = self.changes.as_mut() else {
            return Ok(false);
        };

        match changes.next().await {
            Some(event) => {
                let event = event?;
                log::debug!("Applying {:?} for bookmarks", event.event_type);
                self.apply(event);
                Ok(true)
            }
            None => {
                self.changes = None;
                Ok(false)
            }
        }
    }

    /// Removes the bookmark right away, then asks the server to delete it.
    /// If the server refuses, the previous list comes back unchanged.
    pub async fn delete(&mut self, id: &str) -> Result<(), DeleteError> {
        let snapshot = self.bookmarks.clone();
        self.bookmarks.retain(|bookmark| bookmark.id != id);

        if let Err(err) = self.client.delete_bookmark(id).await {
            log::error!("Error deleting {}: {:#}", id, err);
            self.bookmarks = snapshot;
            return Err(DeleteError {
                id: id.to_string(),
                message: err.to_string(),
            });
        }

        Ok(())
    }

    /// Closes the change subscription; the list keeps its last state.
    pub fn teardown(&mut self) {
        self.changes = None;
    }
}
