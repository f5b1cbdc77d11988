use async_trait::async_trait;
use entities::{Bookmark, ChangeEvent, NewBookmark, User};
use futures::stream::BoxStream;

/// Live change events for the signed-in user's bookmarks. Dropping it closes
/// the subscription.
pub type ChangeStream = BoxStream<'static, anyhow::Result<ChangeEvent>>;

/// Everything the views need from the backend, scoped to one signed-in session.
#[async_trait]
pub trait SessionClient: Send + Sync {
    /// `None` when the session is no longer valid.
    async fn current_user(&self) -> anyhow::Result<Option<User>>;

    async fn sign_out(&self) -> anyhow::Result<()>;

    /// The user's bookmarks, newest first.
    async fn list_bookmarks(&self) -> anyhow::Result<Vec<Bookmark>>;

    async fn insert_bookmark(&self, bookmark: &NewBookmark) -> anyhow::Result<Bookmark>;

    async fn delete_bookmark(&self, id: &str) -> anyhow::Result<()>;

    async fn subscribe(&self) -> anyhow::Result<ChangeStream>;
}
