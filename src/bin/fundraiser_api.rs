//! fundraiser-api: HTTP API for the NGO and fundraiser registry
//!
//! Serves CRUD operations for NGOs, fundraisers and fundraiser updates over
//! a single partition/sort key table.
//!
//! ## Configuration
//! - `config.yaml` in the working directory, or the file named by
//!   FUNDRAISER_CONFIG
//! - FUNDRAISER__SERVER__PORT, FUNDRAISER__SERVER__STATUS_CODES
//! - FUNDRAISER__STORAGE__TYPE (`memory` or `dynamo`)
//! - FUNDRAISER__STORAGE__DYNAMO__TABLE_NAME / __ENDPOINT_URL / __REGION
//! - FUNDRAISER_LOG: tracing filter (default `info`)

use tracing::info;

use fundraiser_registry::config::Config;
use fundraiser_registry::handlers::serve;
use fundraiser_registry::storage::init_storage;
use fundraiser_registry::utils::bootstrap::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();

    let config = Config::load(None)?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        storage = ?config.storage.storage_type,
        "starting fundraiser-api"
    );

    let store = init_storage(&config.storage).await?;
    serve(store, &config.server).await
}
