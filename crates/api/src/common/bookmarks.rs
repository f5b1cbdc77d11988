use std::sync::Arc;

use db::{models::Bookmark, types::DbId};
use entities::{ChangeEvent, NewBookmark};
use web::AppState;

/// Stores a validated bookmark and announces it to the owner's live sessions.
pub async fn create(
    user_id: &DbId,
    new_bookmark: NewBookmark,
    state: &Arc<AppState>,
) -> anyhow::Result<entities::Bookmark> {
    let bookmark: entities::Bookmark =
        Bookmark::create(user_id, new_bookmark.title, new_bookmark.url, &state.db_pool)
            .await?
            .into();

    let delivered = state
        .feed
        .publish(user_id, ChangeEvent::insert(bookmark.clone()))
        .await;
    log::info!(
        "Bookmark {} created by {}, delivered to {} live sessions",
        bookmark.id,
        user_id,
        delivered
    );

    Ok(bookmark)
}

/// Returns `false` when the bookmark doesn't exist or isn't owned by `user_id`.
pub async fn delete(id: &DbId, user_id: &DbId, state: &Arc<AppState>) -> anyhow::Result<bool> {
    match Bookmark::delete_owned(id, user_id, &state.db_pool).await? {
        Some(bookmark) => {
            let delivered = state
                .feed
                .publish(user_id, ChangeEvent::delete(bookmark.id.to_string()))
                .await;
            log::info!(
                "Bookmark {} deleted by {}, delivered to {} live sessions",
                bookmark.id,
                user_id,
                delivered
            );
            Ok(true)
        }
        None => Ok(false),
    }
}

pub async fn list(user_id: &DbId, state: &Arc<AppState>) -> anyhow::Result<Vec<entities::Bookmark>> {
    Ok(Bookmark::by_user(user_id, &state.db_pool)
        .await?
        .into_iter()
        .map(entities::Bookmark::from)
        .collect())
}
