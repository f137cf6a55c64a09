//! In-process table storage.
//!
//! Items are kept in a `BTreeMap` ordered by (pk, sk), so a prefix listing is
//! a range scan that returns items in sort-key order, as DynamoDB does.
//! Failure toggles let tests exercise the error paths of callers.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::interfaces::{item_key, AttributeFilter, Item, Result, StorageError, TableStore};
use crate::keys::{KeyPrefix, StorageKey};

/// In-memory implementation of TableStore.
#[derive(Default)]
pub struct MemoryTableStore {
    items: RwLock<BTreeMap<StorageKey, Item>>,
    fail_on_get: RwLock<bool>,
    fail_on_put: RwLock<bool>,
    fail_on_delete: RwLock<bool>,
    fail_on_query: RwLock<bool>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_fail_on_get(&self, fail: bool) {
        *self.fail_on_get.write().await = fail;
    }

    pub async fn set_fail_on_put(&self, fail: bool) {
        *self.fail_on_put.write().await = fail;
    }

    pub async fn set_fail_on_delete(&self, fail: bool) {
        *self.fail_on_delete.write().await = fail;
    }

    pub async fn set_fail_on_query(&self, fail: bool) {
        *self.fail_on_query.write().await = fail;
    }

    /// Number of stored items across all partitions.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

fn injected(operation: &str) -> StorageError {
    StorageError::Backend(format!("injected {} failure", operation))
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn get(&self, key: &StorageKey) -> Result<Option<Item>> {
        if *self.fail_on_get.read().await {
            return Err(injected("get"));
        }
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn put(&self, item: Item) -> Result<()> {
        if *self.fail_on_put.read().await {
            return Err(injected("put"));
        }
        let key = item_key(&item)?;
        debug!(pk = %key.pk, sk = %key.sk, "Stored item in memory");
        self.items.write().await.insert(key, item);
        Ok(())
    }

    async fn delete(&self, key: &StorageKey) -> Result<()> {
        if *self.fail_on_delete.read().await {
            return Err(injected("delete"));
        }
        self.items.write().await.remove(key);
        Ok(())
    }

    async fn query_prefix(
        &self,
        prefix: &KeyPrefix,
        filter: Option<&AttributeFilter>,
    ) -> Result<Vec<Item>> {
        if *self.fail_on_query.read().await {
            return Err(injected("query"));
        }
        let start = StorageKey::new(prefix.pk.clone(), prefix.sk_prefix.clone());
        let items = self.items.read().await;
        Ok(items
            .range(start..)
            .take_while(|(key, _)| prefix.matches(key))
            .map(|(_, item)| item)
            .filter(|item| filter.map_or(true, |f| f.matches(item)))
            .cloned()
            .collect())
    }
}
