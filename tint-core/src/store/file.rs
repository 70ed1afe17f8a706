use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;
use uuid::Uuid;

use super::KeyValueStore;
use crate::error::{Result, TintError};

/// Backend persisting every record in a single JSON document on disk.
///
/// Writes are serialized through an internal lock and land via
/// tmp-file + rename, so readers observe either the old or the new document.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Map<String, Value>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(Map::new());
            }
            Err(err) => {
                return Err(TintError::StoreUnavailable(format!(
                    "failed to read store {:?}: {err}",
                    self.path
                )));
            }
        };

        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(document)) => Ok(document),
            Ok(_) => Err(TintError::StoreUnavailable(format!(
                "store {:?} does not hold a JSON object",
                self.path
            ))),
            Err(err) => Err(TintError::StoreUnavailable(format!(
                "corrupt store {:?}: {err}",
                self.path
            ))),
        }
    }

    async fn write_document(&self, document: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(|err| {
                TintError::StoreUnavailable(format!(
                    "failed to create store dir {:?}: {err}",
                    parent
                ))
            })?;
        }

        let bytes = serde_json::to_vec_pretty(document)?;
        let tmp = self
            .path
            .with_extension(format!("tmp-{}", Uuid::new_v4().simple()));

        if let Err(err) = write_synced(&tmp, &bytes).await {
            discard_temp(&tmp).await;
            return Err(TintError::StoreUnavailable(format!(
                "failed to write temp store {:?}: {err}",
                tmp
            )));
        }

        if let Err(err) = tokio::fs::rename(&tmp, &self.path).await {
            discard_temp(&tmp).await;
            return Err(TintError::StoreUnavailable(format!(
                "failed to move store {:?} -> {:?}: {err}",
                tmp, self.path
            )));
        }

        Ok(())
    }
}

/// Write `bytes` to a fresh file and flush them to disk before returning.
async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await
}

async fn discard_temp(path: &Path) {
    if let Err(err) = tokio::fs::remove_file(path).await
        && err.kind() != ErrorKind::NotFound
    {
        warn!(path = %path.display(), error = %err, "failed to remove temp store");
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut document = self.read_document().await?;
        Ok(document.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        document.insert(key.to_string(), value);
        self.write_document(&document).await
    }
}
