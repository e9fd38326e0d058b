use crate::core::storage::KeyValueStorage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const SETTINGS_PARTITION: &str = "settings";

/// Storage backed by a fjall keyspace on disk
pub struct DiskStorage {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStorage {
    pub fn open(db_path: &Path) -> Result<Self> {
        std::fs::create_dir_all(db_path)
            .with_context(|| format!("Failed to create directory: {}", db_path.display()))?;

        let keyspace = fjall::Config::new(db_path.join("fjall_db"))
            .open()
            .with_context(|| format!("Failed to open storage at {}", db_path.display()))?;
        let partition = keyspace
            .open_partition(SETTINGS_PARTITION, PartitionCreateOptions::default())
            .context("Failed to open settings partition")?;

        Ok(Self {
            keyspace,
            partition,
        })
    }
}

#[async_trait]
impl KeyValueStorage for DiskStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let Some(value) = self.partition.get(key.as_bytes())? else {
            debug!("Storage MISS for key: {}", key);
            return Ok(None);
        };
        debug!("Storage HIT for key: {}", key);
        let value = String::from_utf8(value.to_vec())
            .with_context(|| format!("Stored value for {key} is not valid UTF-8"))?;
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let keyspace = self.keyspace.clone();
        let partition = self.partition.clone();
        let (k, v) = (key.to_owned(), value.to_owned());

        // The fsync blocks, keep it off the runtime workers.
        tokio::task::spawn_blocking(move || -> Result<()> {
            partition.insert(k.as_bytes(), v.as_bytes())?;
            keyspace.persist(PersistMode::SyncAll)?;
            Ok(())
        })
        .await
        .context("Storage write task failed")??;

        debug!("Storage PUT for key: {}", key);
        Ok(())
    }
}
