use entities::{Bookmark, NewBookmark};

use crate::session::SessionClient;

/// State behind the "Add New Bookmark" form.
#[derive(Debug, Default)]
pub struct AddBookmarkForm {
    pub title: String,
    pub url: String,
    error: Option<String>,
    submitting: bool,
}

impl AddBookmarkForm {
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validates, then inserts. Invalid input never reaches the client.
    /// The new row shows up in lists through the change stream, not here.
    pub async fn submit<C: SessionClient + ?Sized>(&mut self, client: &C) -> Option<Bookmark> {
        self.error = None;

        let new_bookmark = NewBookmark::new(self.title.clone(), self.url.clone());
        if let Err(err) = new_bookmark.validate() {
            self.error = Some(err.message().to_string());
            return None;
        }

        self.submitting = true;
        let result = client.insert_bookmark(&new_bookmark).await;
        self.submitting = false;

        match result {
            Ok(bookmark) => {
                self.title.clear();
                self.url.clear();
                Some(bookmark)
            }
            Err(err) => {
                log::error!("Error saving bookmark: {:#}", err);
                self.error = Some(err.to_string());
                None
            }
        }
    }
}
