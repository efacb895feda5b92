use async_trait::async_trait;
use pv_core::{Error, KeyValueStore, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use crate::{BackendConfig, StorageBackend};

type Items = BTreeMap<String, String>;

/// Storage persisted as a single JSON object on disk.
///
/// The file is re-read on every access so that several `pv` invocations see each
/// other's writes. Writes go to a sibling temp file that is then renamed over the
/// original.
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
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

    async fn load(&self) -> Result<Items> {
        load_json(&self.path).await
    }

    async fn save(&self, items: &Items) -> Result<()> {
        save_json(&self.path, items).await
    }
}

pub(crate) async fn load_json<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    match tokio::fs::read_to_string(path).await {
        Ok(raw) if raw.trim().is_empty() => Ok(T::default()),
        Ok(raw) => serde_json::from_str(&raw)
            .map_err(|e| Error::Storage(format!("Corrupt storage file {}: {}", path.display(), e))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

/// Like [`load_json`], but a corrupt file reads as empty so the next write replaces it.
/// The flag is `true` when the file was corrupt.
pub(crate) async fn load_json_or_reset<T>(path: &Path) -> Result<(T, bool)>
where
    T: serde::de::DeserializeOwned + Default,
{
    match load_json(path).await {
        Ok(value) => Ok((value, false)),
        Err(Error::Storage(msg)) => {
            warn!("{}, starting over", msg);
            Ok((T::default(), true))
        }
        Err(e) => Err(e),
    }
}

pub(crate) async fn save_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    debug!("Wrote {}", path.display());
    Ok(())
}

#[async_trait]
impl StorageBackend for FileStorage {
    fn get_error_message() -> &'static str {
        "Storage file should be writable in the data directory"
    }

    async fn open(config: &BackendConfig) -> Result<Self> {
        Self::new_with_path(config.storage_path()).await
    }
}

#[async_trait]
impl KeyValueStore for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load().await?.remove(key))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let (mut items, _) = load_json_or_reset::<Items>(&self.path).await?;
        items.insert(key.to_string(), value.to_string());
        self.save(&items).await
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let (mut items, corrupt) = load_json_or_reset::<Items>(&self.path).await?;
        if items.remove(key).is_some() || corrupt {
            self.save(&items).await?;
        }
        Ok(())
    }
}
