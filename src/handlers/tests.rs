use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::Router;
use http::{Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::*;
use crate::config::StatusCodePolicy;
use crate::interfaces::TableStore;
use crate::keys::{EntityRef, Listing, OwnerKey, StorageKey};
use crate::repository::OperationError;
use crate::storage::MemoryTableStore;

fn app(policy: StatusCodePolicy) -> (Arc<MemoryTableStore>, Router) {
    let store = Arc::new(MemoryTableStore::new());
    let app = router(store.clone() as Arc<dyn TableStore>, policy);
    (store, app)
}

async fn send(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    send_bytes(app, method, uri, body.as_bytes().to_vec()).await
}

async fn send_bytes(app: &Router, method: Method, uri: &str, body: Vec<u8>) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn params(pairs: &[(&str, &str)]) -> RequestParams {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<HashMap<_, _>>()
        .into()
}

// ============================================================================
// Dispatch table
// ============================================================================

#[test]
fn test_dispatch_table_has_both_naming_schemes() {
    let table = DispatchTable::new();
    assert_eq!(table.len(), 50);

    assert_eq!(
        table.resolve(&Method::GET, "getNgo"),
        Some(Route {
            resource: Resource::Ngo,
            operation: Operation::Fetch
        })
    );
    assert_eq!(
        table.resolve(&Method::GET, "getFundraisersIndividual"),
        Some(Route {
            resource: Resource::FundraiserIndividual,
            operation: Operation::FetchMany
        })
    );
    assert_eq!(
        table.resolve(&Method::PUT, "update"),
        Some(Route {
            resource: Resource::Update,
            operation: Operation::Update
        })
    );
    assert_eq!(
        table.resolve(&Method::DELETE, "fundraiser-ngo"),
        Some(Route {
            resource: Resource::FundraiserNgo,
            operation: Operation::Delete
        })
    );
}

#[test]
fn test_dispatch_table_requires_matching_verb() {
    let table = DispatchTable::new();
    assert!(table.resolve(&Method::POST, "getNgo").is_none());
    assert!(table.resolve(&Method::GET, "createNgo").is_none());
    assert!(table.resolve(&Method::PUT, "ngos").is_none());
    assert!(table.resolve(&Method::GET, "getngo").is_none());
    assert!(table.resolve(&Method::PATCH, "ngo").is_none());
}

// ============================================================================
// Request parameters
// ============================================================================

#[test]
fn test_missing_parameters_read_as_empty() {
    let entity_ref = params(&[]).entity_ref(Resource::Update).unwrap();
    assert_eq!(entity_ref.key(), StorageKey::new("Fundraiser", "Update"));
}

#[test]
fn test_parameters_build_relational_references() {
    let p = params(&[("emailId", "a@b.org"), ("fundraiserId", "f1")]);
    assert_eq!(
        p.entity_ref(Resource::FundraiserIndividual).unwrap(),
        EntityRef::FundraiserIndividual {
            email_id: "a@b.org".to_string(),
            fundraiser_id: "f1".to_string(),
        }
    );
    assert_eq!(
        p.listing(Resource::FundraiserIndividual).unwrap(),
        Listing::FundraisersOfIndividual {
            email_id: "a@b.org".to_string()
        }
    );
}

#[test]
fn test_owner_parameter_must_be_tagged() {
    let tagged = params(&[("owner", "Ngo123"), ("fundraiserId", "f1")]);
    assert_eq!(
        tagged.listing(Resource::Fundraiser).unwrap(),
        Listing::FundraisersOf {
            owner: OwnerKey::Ngo("123".to_string())
        }
    );

    let untagged = params(&[("owner", "123")]);
    assert_eq!(
        untagged.entity_ref(Resource::Fundraiser).unwrap_err(),
        OperationError::InvalidInput
    );
    assert_eq!(
        params(&[]).listing(Resource::Fundraiser).unwrap_err(),
        OperationError::InvalidInput
    );
}

#[test]
fn test_filter_only_for_ngo_listing() {
    assert!(params(&[]).filter(Resource::Ngo).is_none());
    assert!(params(&[("country", ""), ("category", "")])
        .filter(Resource::Ngo)
        .is_none());

    let filter = params(&[("country", "Kenya")])
        .filter(Resource::Ngo)
        .unwrap();
    assert_eq!(filter.conditions().len(), 1);
    assert_eq!(filter.conditions()[0].attribute, "ngoCountry");

    assert!(params(&[("country", "Kenya")])
        .filter(Resource::Update)
        .is_none());
}

// ============================================================================
// Status code policy
// ============================================================================

#[test]
fn test_uniform_policy_is_always_bad_request() {
    for err in [
        OperationError::InvalidInput,
        OperationError::NotFound,
        OperationError::FetchFailed,
        OperationError::WriteFailed,
        OperationError::DoesNotExist,
    ] {
        assert_eq!(
            status_for(StatusCodePolicy::Uniform, &err),
            StatusCode::BAD_REQUEST
        );
    }
}

#[test]
fn test_split_policy() {
    let split = StatusCodePolicy::Split;
    assert_eq!(status_for(split, &OperationError::InvalidInput), StatusCode::BAD_REQUEST);
    assert_eq!(status_for(split, &OperationError::NotFound), StatusCode::NOT_FOUND);
    assert_eq!(status_for(split, &OperationError::DoesNotExist), StatusCode::NOT_FOUND);
    assert_eq!(status_for(split, &OperationError::AlreadyExists), StatusCode::CONFLICT);
    assert_eq!(
        status_for(split, &OperationError::DecodeFailed),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        status_for(split, &OperationError::DeleteFailed),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

// ============================================================================
// Router
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (_, app) = app(StatusCodePolicy::Uniform);

    let (status, _) = send(&app, Method::GET, "/health", "").await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unhandled_operation() {
    let (_, app) = app(StatusCodePolicy::Uniform);

    let (status, body) = send(&app, Method::GET, "/getDonations", "").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"error": "method not allowed"}));

    let (status, _) = send(&app, Method::POST, "/getNgo", "{}").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unmatched_path_is_unhandled_operation() {
    let (_, app) = app(StatusCodePolicy::Uniform);

    for uri in ["/getNgo/extra", "/"] {
        let (status, body) = send(&app, Method::GET, uri, "").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "uri: {uri}");
        assert_eq!(body, json!({"error": "method not allowed"}));
    }
}

#[tokio::test]
async fn test_non_utf8_body_is_invalid_input() {
    let (store, app) = app(StatusCodePolicy::Uniform);

    for (method, uri) in [(Method::POST, "/createNgo"), (Method::PUT, "/updateNgo")] {
        let (status, body) = send_bytes(&app, method, uri, vec![b'{', 0xff, 0xfe, b'}']).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {uri}");
        assert_eq!(body, json!({"error": "invalid user data"}));
    }
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_create_returns_created_record_with_tagged_key() {
    let (store, app) = app(StatusCodePolicy::Uniform);

    let (status, body) = send(
        &app,
        Method::POST,
        "/createNgo",
        r#"{"sk": "123", "ngoName": "Helping Hands"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["pk"], "DetailsNGO");
    assert_eq!(body["sk"], "Ngo123");
    assert_eq!(body["ngoName"], "Helping Hands");
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_fetch_by_query_parameters() {
    let (_, app) = app(StatusCodePolicy::Uniform);
    send(
        &app,
        Method::POST,
        "/createFundraiserNgo",
        r#"{"pk": "123", "sk": "f1", "fundraiserTitle": "Wells"}"#,
    )
    .await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/getFundraiserNgo?ngoId=123&fundraiserId=f1",
        "",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pk"], "Ngo123");
    assert_eq!(body["fundraiserTitle"], "Wells");
}

#[tokio::test]
async fn test_fetch_missing_record() {
    let (_, uniform) = app(StatusCodePolicy::Uniform);
    let (status, body) = send(&uniform, Method::GET, "/getNgo?ngoId=absent", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "record not found"}));

    let (_, split) = app(StatusCodePolicy::Split);
    let (status, _) = send(&split, Method::GET, "/getNgo?ngoId=absent", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_body() {
    for policy in [StatusCodePolicy::Uniform, StatusCodePolicy::Split] {
        let (_, app) = app(policy);
        let (status, body) = send(&app, Method::POST, "/createUpdate", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid user data");
    }
}

#[tokio::test]
async fn test_storage_failure_status_depends_on_policy() {
    let (store, uniform) = app(StatusCodePolicy::Uniform);
    store.set_fail_on_get(true).await;
    let (status, body) = send(&uniform, Method::GET, "/getNgo?ngoId=1", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "failed to fetch record");

    let (store, split) = app(StatusCodePolicy::Split);
    store.set_fail_on_put(true).await;
    let (status, body) = send(&split, Method::POST, "/ngo", r#"{"sk": "1"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "could not put item");
}

#[tokio::test]
async fn test_update_requires_existing_record() {
    let (_, app) = app(StatusCodePolicy::Uniform);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/updateFundraiserIndividual",
        r#"{"pk": "a@b.org", "sk": "ghost"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "record does not exist");

    send(
        &app,
        Method::POST,
        "/createFundraiserIndividual",
        r#"{"pk": "a@b.org", "sk": "f1", "firstname": "Ann"}"#,
    )
    .await;
    let (status, body) = send(
        &app,
        Method::PUT,
        "/updateFundraiserIndividual",
        r#"{"pk": "a@b.org", "sk": "f1", "firstname": "Anne"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pk"], "Individuala@b.org");
    assert_eq!(body["firstname"], "Anne");
}

#[tokio::test]
async fn test_delete_returns_null_body_and_is_idempotent() {
    let (store, app) = app(StatusCodePolicy::Uniform);
    send(&app, Method::POST, "/update", r#"{"pk": "f1", "sk": "u1"}"#).await;

    for _ in 0..2 {
        let (status, body) = send(
            &app,
            Method::DELETE,
            "/deleteUpdate?fundraiserId=f1&updateId=u1",
            "",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_resource_names_and_listing_filters() {
    let (_, app) = app(StatusCodePolicy::Uniform);
    for body in [
        r#"{"sk": "1", "ngoCountry": "Kenya", "ngoCategory": "Health"}"#,
        r#"{"sk": "2", "ngoCountry": "Kenya", "ngoCategory": "Education"}"#,
        r#"{"sk": "3", "ngoCountry": "Chile", "ngoCategory": "Health"}"#,
    ] {
        let (status, _) = send(&app, Method::POST, "/ngo", body).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, all) = send(&app, Method::GET, "/ngos", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, kenya) = send(&app, Method::GET, "/getNgos?country=Kenya", "").await;
    assert_eq!(kenya.as_array().unwrap().len(), 2);

    let (_, filtered) = send(
        &app,
        Method::GET,
        "/ngos?country=Kenya&category=Health",
        "",
    )
    .await;
    let filtered = filtered.as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["sk"], "Ngo1");
}

#[tokio::test]
async fn test_owner_agnostic_fundraiser_routes() {
    let (_, app) = app(StatusCodePolicy::Uniform);

    let (status, body) = send(
        &app,
        Method::POST,
        "/createFundraiser",
        r#"{"pk": "Ngo7", "sk": "f1", "fundraiserCause": "Water"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["sk"], "Fundraiserf1");

    let (status, listed) = send(&app, Method::GET, "/getFundraisersNgo?ngoId=7", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, listed) = send(&app, Method::GET, "/fundraisers?owner=Ngo7", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["fundraiserCause"], "Water");

    let (status, body) = send(&app, Method::GET, "/getFundraiser?fundraiserId=f1", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid user data");
}
