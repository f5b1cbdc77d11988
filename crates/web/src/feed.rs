//! Per-user live change feed.
//!
//! One broadcast channel per user that currently has at least one
//! subscriber. Channels are created on first subscribe and dropped when the
//! last [`FeedSubscription`] goes away, so publishing for users nobody is
//! watching costs a map lookup and nothing else.

use std::{collections::HashMap, sync::Arc};

use db::types::DbId;
use entities::ChangeEvent;
use tokio::sync::{broadcast, RwLock};

pub struct ChangeFeed {
    channels: RwLock<HashMap<DbId, broadcast::Sender<ChangeEvent>>>,
    capacity: usize,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: RwLock::default(),
            capacity: capacity.max(1),
        }
    }

    pub async fn subscribe(self: &Arc<Self>, user_id: &DbId) -> FeedSubscription {
        {
            let channels = self.channels.read().await;
            if let Some(sender) = channels.get(user_id) {
                return FeedSubscription::new(Arc::clone(self), user_id.clone(), sender.subscribe());
            }
        }

        let mut channels = self.channels.write().await;
        let receiver = channels
            .entry(user_id.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe();
        FeedSubscription::new(Arc::clone(self), user_id.clone(), receiver)
    }

    /// Returns the number of subscribers that received the event.
    pub async fn publish(&self, user_id: &DbId, event: ChangeEvent) -> usize {
        let channels = self.channels.read().await;
        match channels.get(user_id) {
            Some(sender) => sender.send(event).unwrap_or(0),
            None => 0,
        }
    }

    pub async fn subscriber_count(&self, user_id: &DbId) -> usize {
        let channels = self.channels.read().await;
        channels
            .get(user_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    async fn close(&self, user_id: &DbId) {
        let mut channels = self.channels.write().await;
        if channels
            .get(user_id)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            channels.remove(user_id);
        }
    }
}

pub struct FeedSubscription {
    feed: Arc<ChangeFeed>,
    user_id: DbId,
    receiver: Option<broadcast::Receiver<ChangeEvent>>,
}

impl FeedSubscription {
    fn new(feed: Arc<ChangeFeed>, user_id: DbId, receiver: broadcast::Receiver<ChangeEvent>) -> Self {
        Self {
            feed,
            user_id,
            receiver: Some(receiver),
        }
    }

    /// Next event for this user. Lagged events are skipped, `None` means the feed is gone.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        let receiver = self.receiver.as_mut()?;
        loop {
            match receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!(
                        "Change feed subscriber for {} lagged, skipped {} events",
                        self.user_id,
                        skipped
                    );
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        // Release the receiver first so the count seen by `close` excludes it
        drop(self.receiver.take());

        let feed = Arc::clone(&self.feed);
        let user_id = self.user_id.clone();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                feed.close(&user_id).await;
            });
        }
    }
}
