use async_trait::async_trait;
use chrono::{Duration, Utc};
use pv_core::{CookieJar, KeyValueStore, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::backends::cookies::Cookie;
use crate::{BackendConfig, StorageBackend};

/// Process-local storage, lost on exit.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    fn get_error_message() -> &'static str {
        "Memory storage should be available"
    }

    async fn open(_config: &BackendConfig) -> Result<Self> {
        Ok(Self::new())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.read().await;
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.write().await;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.write().await;
        items.remove(key);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryCookieJar {
    cookies: Arc<RwLock<HashMap<String, Cookie>>>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryCookieJar {
    fn get_error_message() -> &'static str {
        "Memory cookie jar should be available"
    }

    async fn open(_config: &BackendConfig) -> Result<Self> {
        Ok(Self::new())
    }
}

#[async_trait]
impl CookieJar for MemoryCookieJar {
    async fn get(&self, name: &str) -> Result<Option<String>> {
        let cookies = self.cookies.read().await;
        Ok(cookies
            .get(name)
            .filter(|cookie| !cookie.is_expired(Utc::now()))
            .map(|cookie| cookie.value.clone()))
    }

    async fn set(&self, name: &str, value: &str, max_age: Duration) -> Result<()> {
        let mut cookies = self.cookies.write().await;
        cookies.insert(name.to_string(), Cookie::new(value, max_age));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("history").await.unwrap(), None);

        storage.set_item("history", "[]").await.unwrap();
        storage.set_item("history", "[1]").await.unwrap();
        assert_eq!(storage.get_item("history").await.unwrap().as_deref(), Some("[1]"));

        storage.remove_item("history").await.unwrap();
        storage.remove_item("history").await.unwrap();
        assert_eq!(storage.get_item("history").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_cookie_expiry() {
        let jar = MemoryCookieJar::new();
        jar.set("fresh", "1", Duration::days(1)).await.unwrap();
        jar.set("stale", "2", Duration::seconds(-1)).await.unwrap();

        assert_eq!(jar.get("fresh").await.unwrap().as_deref(), Some("1"));
        assert_eq!(jar.get("stale").await.unwrap(), None);
    }
}
