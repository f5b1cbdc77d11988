use std::sync::Arc;

use diesel_async::{pooled_connection::deadpool::Pool, AsyncPgConnection};

use crate::{config::Config, feed::ChangeFeed};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: Pool<AsyncPgConnection>,
    pub config: Config,
    pub feed: Arc<ChangeFeed>,
}

impl AppState {
    pub fn new(db_pool: Pool<AsyncPgConnection>, config: Config) -> Self {
        let feed = Arc::new(ChangeFeed::new(config.feed.capacity));
        Self {
            db_pool,
            config,
            feed,
        }
    }
}
