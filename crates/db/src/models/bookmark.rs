use chrono::{DateTime, Utc};
use diesel::{insert_into, prelude::*, result::Error::NotFound};
use diesel_async::{pooled_connection::deadpool::Pool, AsyncPgConnection, RunQueryDsl};

use crate::{schema::bookmarks, types::DbId};

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, PartialEq, Clone, Eq)]
#[diesel(table_name = bookmarks)]
pub struct Bookmark {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

// Every query here is scoped by owner; a user never sees or deletes someone else's rows.
impl Bookmark {
    pub async fn create(
        user_id: &DbId,
        title: String,
        url: String,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Self> {
        let bookmark = Bookmark {
            id: DbId::default(),
            user_id: user_id.clone(),
            title,
            url,
            created_at: Utc::now(),
        };

        Ok(insert_into(bookmarks::table)
            .values(bookmark)
            .get_result::<Self>(&mut db_pool.get().await?)
            .await?)
    }

    /// Newest first.
    pub async fn by_user(
        user_id: &DbId,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Vec<Self>> {
        Ok(bookmarks::table
            .filter(bookmarks::user_id.eq(user_id))
            .order((bookmarks::created_at.desc(), bookmarks::id.desc()))
            .load::<Self>(&mut db_pool.get().await?)
            .await?)
    }

    /// Deletes the row if it exists and belongs to `user_id`, returning it.
    pub async fn delete_owned(
        id: &DbId,
        user_id: &DbId,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Option<Self>> {
        let deleted = diesel::delete(
            bookmarks::table
                .filter(bookmarks::id.eq(id))
                .filter(bookmarks::user_id.eq(user_id)),
        )
        .get_result::<Self>(&mut db_pool.get().await?)
        .await;
        match deleted {
            Ok(bookmark) => Ok(Some(bookmark)),
            Err(NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

impl From<Bookmark> for entities::Bookmark {
    fn from(bookmark: Bookmark) -> Self {
        entities::Bookmark {
            id: bookmark.id.into(),
            title: bookmark.title,
            url: bookmark.url,
            user_id: bookmark.user_id.into(),
            created_at: bookmark.created_at,
        }
    }
}
