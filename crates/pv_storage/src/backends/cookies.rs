use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use pv_core::{CookieJar, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use crate::backends::file::{load_json_or_reset, save_json};
use crate::{BackendConfig, StorageBackend};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    pub value: String,
    pub expires: DateTime<Utc>,
}

impl Cookie {
    pub fn new(value: &str, max_age: Duration) -> Self {
        Self {
            value: value.to_string(),
            expires: Utc::now() + max_age,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }
}

type Cookies = BTreeMap<String, Cookie>;

/// Cookie jar persisted as JSON next to the storage file.
pub struct FileCookieJar {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCookieJar {
    pub async fn new_with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StorageBackend for FileCookieJar {
    fn get_error_message() -> &'static str {
        "Cookie file should be writable in the data directory"
    }

    async fn open(config: &BackendConfig) -> Result<Self> {
        Self::new_with_path(config.cookie_path()).await
    }
}

#[async_trait]
impl CookieJar for FileCookieJar {
    async fn get(&self, name: &str) -> Result<Option<String>> {
        let (mut cookies, _): (Cookies, bool) = load_json_or_reset(&self.path).await?;
        Ok(cookies
            .remove(name)
            .filter(|cookie| !cookie.is_expired(Utc::now()))
            .map(|cookie| cookie.value))
    }

    async fn set(&self, name: &str, value: &str, max_age: Duration) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let now = Utc::now();
        let (mut cookies, _): (Cookies, bool) = load_json_or_reset(&self.path).await?;
        cookies.retain(|_, cookie| !cookie.is_expired(now));
        cookies.insert(name.to_string(), Cookie::new(value, max_age));
        save_json(&self.path, &cookies).await
    }
}
