use std::{collections::HashMap, ops::Deref, path::PathBuf, sync::Mutex};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};
use tracing::debug;

/// Interface for abstracting a string key-value store. Values are always replaced as a whole.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` if nothing was ever written under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: String) -> Result<()>;
}

#[async_trait]
impl<T> KeyValueStore for T
where
    T: Deref + Send + Sync,
    T::Target: KeyValueStore,
{
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.deref().get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.deref().set(key, value).await
    }
}

/// Keeps every key in its own file inside a directory.
pub struct FileStore {
    store_dir: PathBuf,
}

impl FileStore {
    pub fn new(store_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&store_dir)?;

        Ok(Self { store_dir })
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            bail!("Illegal store key {key:?}");
        }
        Ok(self.store_dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        debug!("Reading {path:?}");
        let mut file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        file.lock_shared()?;
        let mut value = String::new();
        let result = file.read_to_string(&mut value).await;
        file.unlock_async().await?;
        result?;

        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let path = self.key_path(key)?;
        debug!("Writing {} bytes into {path:?}", value.len());

        // Truncating has to wait for the lock, otherwise a concurrent reader could see an empty
        // file.
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .await?;

        file.lock_exclusive()?;
        let result = async {
            file.set_len(0).await?;
            file.rewind().await?;
            file.write_all(value.as_bytes()).await?;
            file.flush().await?;
            file.sync_data().await?;
            Ok::<_, std::io::Error>(())
        }
        .await;
        file.unlock_async().await?;
        result?;
        Ok(())
    }
}

/// Store living only in memory. An optional quota limits the total bytes of keys and values the
/// same way browser storage does.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            values: Mutex::default(),
            quota: Some(quota),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow!("Memory store lock was poisoned"))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow!("Memory store lock was poisoned"))?;

        if let Some(quota) = self.quota {
            let used: usize = values
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let required = used + key.len() + value.len();
            if required > quota {
                bail!("Storage quota exceeded: {required} of {quota} bytes required");
            }
        }

        values.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use super::{FileStore, KeyValueStore, MemoryStore};

    #[tokio::test]
    async fn file_store_absent_key() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path().join("store"))?;

        assert_eq!(store.get("missing").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn file_store_overwrite_truncates() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path().to_owned())?;

        store.set("entries", "[1,2,3,4,5,6]".into()).await?;
        store.set("entries", "[]".into()).await?;

        assert_eq!(store.get("entries").await?.as_deref(), Some("[]"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("entries.json"))?,
            "[]"
        );
        Ok(())
    }

    #[tokio::test]
    async fn file_store_keys_are_independent() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path().to_owned())?;

        store.set("a", "1".into()).await?;
        store.set("b", "2".into()).await?;

        assert_eq!(store.get("a").await?.as_deref(), Some("1"));
        assert_eq!(store.get("b").await?.as_deref(), Some("2"));
        Ok(())
    }

    #[tokio::test]
    async fn file_store_rejects_path_keys() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path().to_owned())?;

        assert!(store.set("../escape", "x".into()).await.is_err());
        assert!(store.get("nested/key").await.is_err());
        assert!(store.get("").await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn memory_store_quota_keeps_previous_value() -> Result<()> {
        let store = MemoryStore::with_quota(10);

        store.set("k", "short".into()).await?;
        assert!(store.set("k", "much too long".into()).await.is_err());
        assert_eq!(store.get("k").await?.as_deref(), Some("short"));

        // replacing a value only counts the new one
        store.set("k", "123456789".into()).await?;
        Ok(())
    }
}
