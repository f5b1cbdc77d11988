use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use entities::{Bookmark, ChangeEvent, NewBookmark, User};
use futures::channel::mpsc;

use crate::session::{ChangeStream, SessionClient};

pub const FAKE_USER_ID: &str = "2ZyGvHWo1d3nqHFUxLIAX6LYnWq";

/// Row owned by the fake user, `minute` minutes after a fixed epoch.
pub fn bookmark(id: &str, minute: i64) -> Bookmark {
    Bookmark {
        id: id.to_string(),
        title: format!("Bookmark {id}"),
        url: format!("https://example.com/{id}"),
        user_id: FAKE_USER_ID.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::minutes(minute),
    }
}

/// In-memory backend that mirrors what the server does: inserts and deletes
/// are echoed on the change stream.
pub struct FakeClient {
    pub user: User,
    rows: Mutex<Vec<Bookmark>>,
    inserted: Mutex<Vec<NewBookmark>>,
    deleted: Mutex<Vec<String>>,
    fail_list: AtomicBool,
    fail_inserts: AtomicBool,
    fail_deletes: AtomicBool,
    signed_out: AtomicBool,
    sender: Mutex<Option<mpsc::UnboundedSender<anyhow::Result<ChangeEvent>>>>,
    receiver: Mutex<Option<mpsc::UnboundedReceiver<anyhow::Result<ChangeEvent>>>>,
}

impl FakeClient {
    pub fn with_rows(rows: Vec<Bookmark>) -> Arc<Self> {
        let (sender, receiver) = mpsc::unbounded();
        Arc::new(Self {
            user: User {
                id: FAKE_USER_ID.to_string(),
                name: String::from("kage"),
                email: String::from("kage@example.com"),
                full_name: None,
            },
            rows: Mutex::new(rows),
            inserted: Mutex::default(),
            deleted: Mutex::default(),
            fail_list: AtomicBool::new(false),
            fail_inserts: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            signed_out: AtomicBool::new(false),
            sender: Mutex::new(Some(sender)),
            receiver: Mutex::new(Some(receiver)),
        })
    }

    pub fn fail_list(&self) {
        self.fail_list.store(true, Ordering::SeqCst);
    }

    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    pub fn emit(&self, event: ChangeEvent) {
        if let Some(sender) = self.sender.lock().unwrap().as_ref() {
            let _ = sender.unbounded_send(Ok(event));
        }
    }

    pub fn close_feed(&self) {
        self.sender.lock().unwrap().take();
    }

    pub fn subscription_closed(&self) -> bool {
        self.sender
            .lock()
            .unwrap()
            .as_ref()
            .map_or(true, |sender| sender.is_closed())
    }

    pub fn inserted(&self) -> Vec<NewBookmark> {
        self.inserted.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn is_signed_out(&self) -> bool {
        self.signed_out.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionClient for FakeClient {
    async fn current_user(&self) -> anyhow::Result<Option<User>> {
        if self.is_signed_out() {
            Ok(None)
        } else {
            Ok(Some(self.user.clone()))
        }
    }

    async fn sign_out(&self) -> anyhow::Result<()> {
        self.signed_out.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn list_bookmarks(&self) -> anyhow::Result<Vec<Bookmark>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(anyhow!("connection reset"));
        }
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_bookmark(&self, new_bookmark: &NewBookmark) -> anyhow::Result<Bookmark> {
        self.inserted.lock().unwrap().push(new_bookmark.clone());
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(anyhow!("new row violates row-level security policy"));
        }

        let created = {
            let mut rows = self.rows.lock().unwrap();
            let created = Bookmark {
                id: format!("n{}", rows.len() + 1),
                title: new_bookmark.title.clone(),
                url: new_bookmark.url.clone(),
                user_id: self.user.id.clone(),
                created_at: Utc::now(),
            };
            rows.push(created.clone());
            created
        };
        self.emit(ChangeEvent::insert(created.clone()));
        Ok(created)
    }

    async fn delete_bookmark(&self, id: &str) -> anyhow::Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(anyhow!("permission denied for table bookmarks"));
        }
        self.deleted.lock().unwrap().push(id.to_string());
        self.rows.lock().unwrap().retain(|row| row.id != id);
        self.emit(ChangeEvent::delete(id));
        Ok(())
    }

    async fn subscribe(&self) -> anyhow::Result<ChangeStream> {
        let receiver = self
            .receiver
            .lock()
            .unwrap()
            .take()
            .ok_or(anyhow!("already subscribed"))?;
        Ok(Box::pin(receiver))
    }
}
