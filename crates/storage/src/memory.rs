use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::store::SnapshotStore;

/// Process-local store, used by tests and throwaway runs.
#[derive(Clone, Default)]
pub struct MemoryStore {
    snapshots: Arc<Mutex<HashMap<String, String>>>,
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn read(&self, key: &str) -> anyhow::Result<Option<String>> {
        let map = self
            .snapshots
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory store lock poisoned"))?;
        Ok(map.get(key).cloned())
    }

    async fn write(&self, key: &str, value: String) -> anyhow::Result<()> {
        let mut map = self
            .snapshots
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory store lock poisoned"))?;
        map.insert(key.to_string(), value);
        Ok(())
    }
}
