use chrono::{DateTime, Utc};
use diesel::{insert_into, prelude::*, result::Error::NotFound};
use diesel_async::{pooled_connection::deadpool::Pool, AsyncPgConnection, RunQueryDsl};

use crate::{schema::users, types::DbId};

#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, PartialEq, Clone, Eq)]
#[diesel(table_name = users)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub full_name: Option<String>,
    pub password_encrypted: String,
    pub published: DateTime<Utc>,
}

impl User {
    pub async fn create(
        name: String,
        email: String,
        full_name: Option<String>,
        password_encrypted: String,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Self> {
        let user = User {
            id: DbId::default(),
            name,
            email,
            full_name,
            password_encrypted,
            published: Utc::now(),
        };

        Ok(insert_into(users::table)
            .values(user)
            .get_result::<Self>(&mut db_pool.get().await?)
            .await?)
    }

    pub async fn by_id(
        id: &DbId,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Option<Self>> {
        let user = users::table
            .filter(users::id.eq(id))
            .first::<Self>(&mut db_pool.get().await?)
            .await;
        match user {
            Ok(user) => Ok(Some(user)),
            Err(NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn by_name(
        name: &str,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Option<Self>> {
        let user = users::table
            .filter(users::name.eq(name.to_string()))
            .first::<Self>(&mut db_pool.get().await?)
            .await;
        match user {
            Ok(user) => Ok(Some(user)),
            Err(NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

impl From<User> for entities::User {
    fn from(user: User) -> Self {
        entities::User {
            id: user.id.into(),
            name: user.name,
            email: user.email,
            full_name: user.full_name,
        }
    }
}
