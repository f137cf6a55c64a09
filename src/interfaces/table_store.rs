//! Table storage interface.

use async_trait::async_trait;
use serde_json::Value;

use crate::keys::{KeyPrefix, StorageKey, PARTITION_KEY_ATTR, SORT_KEY_ATTR};

/// A stored record: key attributes plus any other attributes.
pub type Item = serde_json::Map<String, Value>;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Item is missing string key attribute '{0}'")]
    MissingKey(&'static str),
}

/// Substring (or list membership) condition on one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contains {
    pub attribute: String,
    pub value: String,
}

impl Contains {
    fn matches(&self, item: &Item) -> bool {
        match item.get(&self.attribute) {
            Some(Value::String(s)) => s.contains(&self.value),
            Some(Value::Array(values)) => values
                .iter()
                .any(|v| v.as_str() == Some(self.value.as_str())),
            _ => false,
        }
    }
}

/// Conjunction of [`Contains`] conditions applied after the key condition.
///
/// Filtering narrows the result set only; every item in the listed partition
/// range is still read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeFilter {
    conditions: Vec<Contains>,
}

impl AttributeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `attribute` to contain `value`. An empty value adds no condition.
    pub fn contains(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.conditions.push(Contains {
                attribute: attribute.into(),
                value,
            });
        }
        self
    }

    pub fn conditions(&self) -> &[Contains] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.conditions.iter().all(|c| c.matches(item))
    }
}

/// Read the storage key carried by an item's key attributes.
pub fn item_key(item: &Item) -> Result<StorageKey> {
    let pk = item
        .get(PARTITION_KEY_ATTR)
        .and_then(Value::as_str)
        .ok_or(StorageError::MissingKey(PARTITION_KEY_ATTR))?;
    let sk = item
        .get(SORT_KEY_ATTR)
        .and_then(Value::as_str)
        .ok_or(StorageError::MissingKey(SORT_KEY_ATTR))?;
    Ok(StorageKey::new(pk, sk))
}

/// Interface for the single shared table.
///
/// Every call either succeeds or surfaces its failure immediately; no
/// retries, timeouts or conditional writes are applied at this layer.
///
/// Implementations:
/// - `MemoryTableStore`: in-process table
/// - `DynamoTableStore`: AWS DynamoDB
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Point read by exact key.
    ///
    /// Returns `None` if no item has this key.
    async fn get(&self, key: &StorageKey) -> Result<Option<Item>>;

    /// Write an item, replacing any item with the same key.
    ///
    /// The key is taken from the item's `pk` and `sk` attributes.
    async fn put(&self, item: Item) -> Result<()>;

    /// Delete by exact key. Deleting an absent key succeeds.
    async fn delete(&self, key: &StorageKey) -> Result<()>;

    /// All items in `prefix.pk` whose sort key begins with `prefix.sk_prefix`,
    /// ordered by sort key, optionally narrowed by `filter`.
    async fn query_prefix(
        &self,
        prefix: &KeyPrefix,
        filter: Option<&AttributeFilter>,
    ) -> Result<Vec<Item>>;
}
