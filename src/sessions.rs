//! Открытые страницы бронирования.
//!
//! Закрытая вкладка не присылает DELETE, поэтому сессии без обращений
//! дольше `ttl` удаляются фоновой задачей (`sweep_expired`).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::services::PageController;
use crate::sheet_client::SheetClient;

pub type PageHandle<B = SheetClient> = Arc<Mutex<PageController<B>>>;

struct SessionEntry<B> {
    page: PageHandle<B>,
    touched: Instant,
}

pub struct SessionStore<B = SheetClient> {
    sessions: RwLock<HashMap<Uuid, SessionEntry<B>>>,
    ttl: Duration,
}

impl<B> SessionStore<B> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn insert(&self, page: PageController<B>) -> Uuid {
        let session_id = Uuid::new_v4();
        let entry = SessionEntry {
            page: Arc::new(Mutex::new(page)),
            touched: Instant::now(),
        };
        self.sessions.write().await.insert(session_id, entry);
        session_id
    }

    /// Возвращает страницу и продлевает ей жизнь.
    pub async fn get(&self, session_id: &Uuid) -> Option<PageHandle<B>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(session_id)?;
        entry.touched = Instant::now();
        Some(entry.page.clone())
    }

    pub async fn remove(&self, session_id: &Uuid) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn sweep_expired(&self) -> usize {
        self.sweep_at(Instant::now()).await
    }

    /// Удаляет сессии, к которым не обращались дольше `ttl` к моменту `now`.
    /// Отправка, начатая до удаления, доводится до конца своей задачей.
    pub async fn sweep_at(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now.saturating_duration_since(entry.touched) <= self.ttl);
        let removed = before - sessions.len();
        if removed > 0 {
            info!("Expired {} booking page sessions, {} left", removed, sessions.len());
        }
        removed
    }
}
