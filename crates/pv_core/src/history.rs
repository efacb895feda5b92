use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, warn};
use crate::storage::KeyValueStore;
use crate::types::Article;
use crate::Result;

pub const HISTORY_KEY: &str = "history";

/// Recently viewed articles, most recent first, persisted as one JSON array.
#[derive(Clone)]
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
    capacity: Option<NonZeroUsize>,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: HISTORY_KEY.to_string(),
            capacity: None,
        }
    }

    /// Keep at most `capacity` entries; the oldest ones are dropped on `push`.
    pub fn with_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.capacity
    }

    /// Never fails: a missing, unreadable or malformed entry reads as an empty history.
    pub async fn get(&self) -> Vec<Article> {
        let raw = match self.store.get_item(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read history: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(history) => history,
            Err(e) => {
                warn!("Ignoring malformed history: {}", e);
                Vec::new()
            }
        }
    }

    /// Record a view of `item`: any older entry with the same id is dropped and the
    /// item goes to the front with its score cleared.
    pub async fn push(&self, item: Article) -> Result<()> {
        let mut history: Vec<Article> = self
            .get()
            .await
            .into_iter()
            .filter(|article| article.item_id != item.item_id)
            .collect();

        debug!("Adding {} to history", item.item_id);
        history.insert(0, item.without_score());
        if let Some(capacity) = self.capacity {
            history.truncate(capacity.get());
        }

        let json = serde_json::to_string(&history)?;
        self.store.set_item(&self.key, &json).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.remove_item(&self.key).await
    }

    pub async fn len(&self) -> usize {
        self.get().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
