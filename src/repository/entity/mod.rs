//! Entity repository.
//!
//! Applies the key scheme to one entity kind and maps storage results into
//! [`OperationError`]s.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, warn};

use super::OperationError;
use crate::entities::TableEntity;
use crate::interfaces::{AttributeFilter, Item, StorageError, TableStore};
use crate::keys::{reserved_tag, EntityRef, Listing};

type Result<T> = std::result::Result<T, OperationError>;

/// Repository for one entity kind.
///
/// Holds no state besides the store handle; concurrent calls only meet in
/// the backend.
pub struct EntityRepository<E> {
    store: Arc<dyn TableStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityRepository<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<E: TableEntity> EntityRepository<E> {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Look up one record by exact key.
    ///
    /// Returns `None` if no record has the key.
    pub async fn fetch(&self, entity_ref: &EntityRef) -> Result<Option<E>> {
        warn_reserved(entity_ref);
        let key = entity_ref.key();
        debug!(kind = %E::KIND, pk = %key.pk, sk = %key.sk, "Fetching record");

        let item = self.store.get(&key).await.map_err(|e| {
            error!(kind = %E::KIND, pk = %key.pk, sk = %key.sk, error = %e, "Fetch failed");
            read_error(e)
        })?;

        item.map(decode).transpose()
    }

    /// All records in a listing, optionally narrowed by `filter`.
    ///
    /// An empty listing is not a failure.
    pub async fn fetch_many(
        &self,
        listing: &Listing,
        filter: Option<&AttributeFilter>,
    ) -> Result<Vec<E>> {
        let prefix = listing.prefix();
        debug!(
            kind = %E::KIND,
            pk = %prefix.pk,
            sk_prefix = %prefix.sk_prefix,
            "Listing records"
        );

        let items = self
            .store
            .query_prefix(&prefix, filter)
            .await
            .map_err(|e| {
                error!(kind = %E::KIND, pk = %prefix.pk, error = %e, "Listing failed");
                read_error(e)
            })?;

        items.into_iter().map(decode).collect()
    }

    /// Decode a request body and write it under its canonical key.
    ///
    /// Overwrites any record with the same key.
    pub async fn create(&self, body: impl AsRef<[u8]>) -> Result<E> {
        let (entity, entity_ref) = parse_body::<E>(body.as_ref())?;
        warn_reserved(&entity_ref);
        self.write(entity, &entity_ref).await
    }

    /// Decode a request body and overwrite an existing record.
    ///
    /// Existence is checked with a read before the write. The two calls are
    /// not atomic: a concurrent delete between them is not detected and the
    /// write recreates the record.
    pub async fn update(&self, body: impl AsRef<[u8]>) -> Result<E> {
        let (entity, entity_ref) = parse_body::<E>(body.as_ref())?;

        match self.fetch(&entity_ref).await? {
            Some(current) if !current.sort_key().is_empty() => {}
            _ => {
                debug!(kind = %E::KIND, key = %entity_ref.key(), "Update target does not exist");
                return Err(OperationError::DoesNotExist);
            }
        }

        self.write(entity, &entity_ref).await
    }

    /// Delete one record by exact key. Deleting an absent record succeeds.
    ///
    /// Records stored under the deleted record's id are left in place.
    pub async fn delete(&self, entity_ref: &EntityRef) -> Result<()> {
        warn_reserved(entity_ref);
        let key = entity_ref.key();
        debug!(kind = %E::KIND, pk = %key.pk, sk = %key.sk, "Deleting record");

        self.store.delete(&key).await.map_err(|e| {
            error!(kind = %E::KIND, pk = %key.pk, sk = %key.sk, error = %e, "Delete failed");
            OperationError::DeleteFailed
        })
    }

    async fn write(&self, mut entity: E, entity_ref: &EntityRef) -> Result<E> {
        let key = entity_ref.key();
        entity.assign_key(key.clone());

        let item = encode(&entity)?;
        self.store.put(item).await.map_err(|e| {
            error!(kind = %E::KIND, pk = %key.pk, sk = %key.sk, error = %e, "Write failed");
            match e {
                StorageError::Serialization(_) | StorageError::MissingKey(_) => {
                    OperationError::EncodeFailed
                }
                StorageError::Backend(_) => OperationError::WriteFailed,
            }
        })?;

        debug!(kind = %E::KIND, pk = %key.pk, sk = %key.sk, "Stored record");
        Ok(entity)
    }
}

fn parse_body<E: TableEntity>(body: &[u8]) -> Result<(E, EntityRef)> {
    let entity: E = serde_json::from_slice(body).map_err(|e| {
        warn!(kind = %E::KIND, error = %e, "Rejected request body");
        OperationError::InvalidInput
    })?;

    let entity_ref = entity.reference().ok_or_else(|| {
        warn!(kind = %E::KIND, "Request body does not name a valid key");
        OperationError::InvalidInput
    })?;

    Ok((entity, entity_ref))
}

fn read_error(e: StorageError) -> OperationError {
    match e {
        StorageError::Serialization(_) => OperationError::DecodeFailed,
        StorageError::Backend(_) | StorageError::MissingKey(_) => OperationError::FetchFailed,
    }
}

fn decode<E: TableEntity>(item: Item) -> Result<E> {
    serde_json::from_value(Value::Object(item)).map_err(|e| {
        error!(kind = %E::KIND, error = %e, "Stored record does not match shape");
        OperationError::DecodeFailed
    })
}

fn encode<E: TableEntity>(entity: &E) -> Result<Item> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(item)) => Ok(item),
        Ok(_) => Err(OperationError::EncodeFailed),
        Err(e) => {
            error!(kind = %E::KIND, error = %e, "Could not encode record");
            Err(OperationError::EncodeFailed)
        }
    }
}

fn warn_reserved(entity_ref: &EntityRef) {
    for id in entity_ref.identifiers() {
        if let Some(tag) = reserved_tag(id) {
            warn!(
                kind = %entity_ref.kind(),
                id = %id,
                tag = %tag,
                "Identifier begins with a reserved tag; key may collide with another kind"
            );
        }
    }
}
