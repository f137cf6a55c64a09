//! Axum router and request dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::error::{operation_error, UnhandledOperation};
use super::params::RequestParams;
use super::routes::{DispatchTable, Operation, Resource, Route};
use crate::config::{ServerConfig, StatusCodePolicy};
use crate::entities::{Fundraiser, FundraiserIndividual, FundraiserNgo, Ngo, TableEntity, Update};
use crate::interfaces::TableStore;
use crate::repository::{EntityRepository, OperationError};

/// Shared state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    ngos: EntityRepository<Ngo>,
    fundraisers_ngo: EntityRepository<FundraiserNgo>,
    fundraisers_individual: EntityRepository<FundraiserIndividual>,
    fundraisers: EntityRepository<Fundraiser>,
    updates: EntityRepository<Update>,
    routes: Arc<DispatchTable>,
    policy: StatusCodePolicy,
}

impl AppState {
    pub fn new(store: Arc<dyn TableStore>, policy: StatusCodePolicy) -> Self {
        Self {
            ngos: EntityRepository::new(store.clone()),
            fundraisers_ngo: EntityRepository::new(store.clone()),
            fundraisers_individual: EntityRepository::new(store.clone()),
            fundraisers: EntityRepository::new(store.clone()),
            updates: EntityRepository::new(store),
            routes: Arc::new(DispatchTable::new()),
            policy,
        }
    }
}

/// Start the HTTP server.
///
/// When `config.port` is 0, the OS assigns an ephemeral port. The actual
/// bound address is always logged.
pub async fn serve(
    store: Arc<dyn TableStore>,
    config: &ServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = router(store, config.status_codes);
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    let local_addr = listener.local_addr()?;
    info!(address = %local_addr, policy = ?config.status_codes, "Registry API listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the axum router (separated for testing).
pub fn router(store: Arc<dyn TableStore>, policy: StatusCodePolicy) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/:operation", any(dispatch))
        .fallback(unrouted)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState::new(store, policy))
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn unrouted(method: Method, uri: Uri) -> Response {
    warn!(method = %method, path = %uri.path(), "Unhandled path");
    UnhandledOperation.into_response()
}

async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    Path(operation): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let Some(route) = state.routes.resolve(&method, &operation) else {
        warn!(method = %method, operation = %operation, "Unhandled operation");
        return UnhandledOperation.into_response();
    };

    let params = RequestParams::from(params);
    let result = match route.resource {
        Resource::Ngo => execute(&state.ngos, route, &params, &body).await,
        Resource::FundraiserNgo => execute(&state.fundraisers_ngo, route, &params, &body).await,
        Resource::FundraiserIndividual => {
            execute(&state.fundraisers_individual, route, &params, &body).await
        }
        Resource::Fundraiser => execute(&state.fundraisers, route, &params, &body).await,
        Resource::Update => execute(&state.updates, route, &params, &body).await,
    };

    match result {
        Ok(response) => response,
        Err(err) => {
            warn!(
                resource = %route.resource,
                operation = ?route.operation,
                error = %err,
                "Operation failed"
            );
            operation_error(state.policy, err)
        }
    }
}

async fn execute<E: TableEntity>(
    repo: &EntityRepository<E>,
    route: Route,
    params: &RequestParams,
    body: &[u8],
) -> Result<Response, OperationError> {
    let response = match route.operation {
        Operation::Fetch => {
            let entity_ref = params.entity_ref(route.resource)?;
            let entity = repo
                .fetch(&entity_ref)
                .await?
                .ok_or(OperationError::NotFound)?;
            (StatusCode::OK, Json(entity)).into_response()
        }
        Operation::FetchMany => {
            let listing = params.listing(route.resource)?;
            let filter = params.filter(route.resource);
            let entities = repo.fetch_many(&listing, filter.as_ref()).await?;
            (StatusCode::OK, Json(entities)).into_response()
        }
        Operation::Create => {
            let entity = repo.create(body).await?;
            (StatusCode::CREATED, Json(entity)).into_response()
        }
        Operation::Update => {
            let entity = repo.update(body).await?;
            (StatusCode::OK, Json(entity)).into_response()
        }
        Operation::Delete => {
            let entity_ref = params.entity_ref(route.resource)?;
            repo.delete(&entity_ref).await?;
            (StatusCode::OK, Json(Value::Null)).into_response()
        }
    };
    Ok(response)
}
