//! Storage implementations.

use std::sync::Arc;

use tracing::info;
#[cfg(not(feature = "dynamo"))]
use tracing::error;

use crate::config::{StorageConfig, StorageType};
use crate::interfaces::TableStore;

pub mod memory;

#[cfg(feature = "dynamo")]
pub mod dynamo;

pub use memory::MemoryTableStore;

#[cfg(feature = "dynamo")]
pub use dynamo::DynamoTableStore;

/// Initialize storage based on configuration.
///
/// Returns the `TableStore` implementation for the configured storage type.
pub async fn init_storage(
    config: &StorageConfig,
) -> Result<Arc<dyn TableStore>, Box<dyn std::error::Error + Send + Sync>> {
    match config.storage_type {
        StorageType::Memory => {
            info!("Storage: in-memory table");
            Ok(Arc::new(MemoryTableStore::new()))
        }
        #[cfg(feature = "dynamo")]
        StorageType::Dynamo => {
            let dynamo = &config.dynamo;
            info!(
                table = %dynamo.table_name,
                endpoint = ?dynamo.endpoint_url,
                "Storage: DynamoDB"
            );
            let store = DynamoTableStore::new(
                &dynamo.table_name,
                dynamo.endpoint_url.as_deref(),
                dynamo.region.as_deref(),
            )
            .await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "dynamo"))]
        StorageType::Dynamo => {
            error!("DynamoDB storage requested but 'dynamo' feature is not enabled");
            Err("DynamoDB feature not enabled".into())
        }
    }
}
