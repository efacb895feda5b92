use async_trait::async_trait;
use pv_core::{CookieJar, Error, KeyValueStore, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub mod backends;

pub use backends::*;

pub const STORAGE_FILE: &str = "storage.json";
pub const COOKIE_FILE: &str = "cookies.json";

#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn get_error_message() -> &'static str;
    async fn open(config: &BackendConfig) -> Result<Self> where Self: Sized;
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub data_dir: PathBuf,
}

impl BackendConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(STORAGE_FILE)
    }

    pub fn cookie_path(&self) -> PathBuf {
        self.data_dir.join(COOKIE_FILE)
    }
}

async fn open_backend<T: StorageBackend + 'static>(config: &BackendConfig) -> Result<T> {
    T::open(config)
        .await
        .map_err(|e| Error::Storage(format!("{} ({})", T::get_error_message(), e)))
}

/// Build the local storage backend named by `kind` (`memory` or `file`).
pub async fn create_storage(kind: &str, data_dir: &Path) -> Result<Arc<dyn KeyValueStore>> {
    let config = BackendConfig::new(data_dir);
    let storage: Arc<dyn KeyValueStore> = match kind {
        "memory" => Arc::new(open_backend::<MemoryStorage>(&config).await?),
        "file" => Arc::new(open_backend::<FileStorage>(&config).await?),
        other => return Err(Error::Config(format!("Unknown storage backend: {}", other))),
    };
    info!("💾 Local storage ready (using {})", kind);
    Ok(storage)
}

/// Build the cookie jar matching the storage backend `kind`.
pub async fn create_cookie_jar(kind: &str, data_dir: &Path) -> Result<Arc<dyn CookieJar>> {
    let config = BackendConfig::new(data_dir);
    match kind {
        "memory" => Ok(Arc::new(open_backend::<MemoryCookieJar>(&config).await?)),
        "file" => Ok(Arc::new(open_backend::<FileCookieJar>(&config).await?)),
        other => Err(Error::Config(format!("Unknown storage backend: {}", other))),
    }
}

pub mod prelude {
    pub use super::{create_cookie_jar, create_storage, BackendConfig, StorageBackend};
    pub use super::backends::*;
}
