use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use diesel::{insert_into, prelude::*, result::Error::NotFound};
use diesel_async::{pooled_connection::deadpool::Pool, AsyncPgConnection, RunQueryDsl};

use crate::{models::User, schema::sessions, types::DbId, utils::random_string};

pub const TOKEN_LENGTH: usize = 60;

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, PartialEq, Clone, Eq)]
#[diesel(table_name = sessions)]
pub struct Session {
    pub id: DbId,
    pub token: String,
    pub user_id: DbId,
    pub published: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub async fn create(
        user_id: DbId,
        lifetime: Duration,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Self> {
        let now = Utc::now();
        let session = Session {
            id: DbId::default(),
            token: random_string(TOKEN_LENGTH),
            user_id,
            published: now,
            expires_at: now + lifetime,
        };

        Ok(insert_into(sessions::table)
            .values(session)
            .get_result::<Session>(&mut db_pool.get().await?)
            .await?)
    }

    /// Looks a token up regardless of expiry, callers decide what stale means.
    pub async fn by_token(
        token: &str,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Option<Self>> {
        let session = sessions::table
            .filter(sessions::token.eq(token.to_string()))
            .first::<Self>(&mut db_pool.get().await?)
            .await;
        match session {
            Ok(session) => Ok(Some(session)),
            Err(NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// True once less than `threshold` of the session's lifetime is left.
    pub fn needs_refresh(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        !self.is_expired(now) && self.expires_at - now < threshold
    }

    /// Slides the expiry to `now + lifetime`, keeping the token.
    pub async fn refresh(
        &self,
        lifetime: Duration,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Self> {
        Ok(diesel::update(self)
            .set(sessions::expires_at.eq(Utc::now() + lifetime))
            .get_result::<Self>(&mut db_pool.get().await?)
            .await?)
    }

    pub async fn user(&self, db_pool: &Pool<AsyncPgConnection>) -> anyhow::Result<User> {
        User::by_id(&self.user_id, db_pool)
            .await?
            .ok_or(anyhow!("session {} points to a missing user", self.id))
    }

    pub async fn delete(&self, db_pool: &Pool<AsyncPgConnection>) -> anyhow::Result<()> {
        diesel::delete(self)
            .execute(&mut db_pool.get().await?)
            .await?;
        Ok(())
    }

    /// Returns how many sessions were removed (0 or 1).
    pub async fn delete_by_token(
        token: &str,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<usize> {
        Ok(
            diesel::delete(sessions::table.filter(sessions::token.eq(token.to_string())))
                .execute(&mut db_pool.get().await?)
                .await?,
        )
    }
}
