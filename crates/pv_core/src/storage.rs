use async_trait::async_trait;
use chrono::Duration;
use crate::Result;

/// String key/value storage with the semantics of a browser's local storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `None` when the key was never set or has been removed.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`.
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error.
    async fn remove_item(&self, key: &str) -> Result<()>;
}

/// Named cookies with an expiry.
#[async_trait]
pub trait CookieJar: Send + Sync {
    /// Read a cookie; expired cookies are reported as absent.
    async fn get(&self, name: &str) -> Result<Option<String>>;

    /// Set a cookie that expires `max_age` from now.
    async fn set(&self, name: &str, value: &str, max_age: Duration) -> Result<()>;
}
