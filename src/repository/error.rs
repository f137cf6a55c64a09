//! Failures of entity access operations.
//!
//! Every entity kind shares these variants and their client-facing messages.
//! Storage detail is logged where the failure happens and is not carried
//! into the message.

/// Failure of a Fetch, FetchMany, Create, Update or Delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OperationError {
    /// Request payload cannot be decoded into the entity shape.
    #[error("invalid user data")]
    InvalidInput,

    /// No record has the requested key.
    #[error("record not found")]
    NotFound,

    /// Storage read failed.
    #[error("failed to fetch record")]
    FetchFailed,

    /// Stored record cannot be decoded into the entity shape.
    #[error("failed to unmarshal record")]
    DecodeFailed,

    /// Entity cannot be encoded for storage.
    #[error("could not marshal item")]
    EncodeFailed,

    /// Storage write failed.
    #[error("could not put item")]
    WriteFailed,

    /// Storage delete failed.
    #[error("could not delete item")]
    DeleteFailed,

    /// A record already holds the key. Upserting writes never raise this.
    #[error("record already exists")]
    AlreadyExists,

    /// Update targeted a record that is not stored.
    #[error("record does not exist")]
    DoesNotExist,
}

impl OperationError {
    /// Whether the failure originates in the request rather than in storage.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            OperationError::InvalidInput
                | OperationError::NotFound
                | OperationError::AlreadyExists
                | OperationError::DoesNotExist
        )
    }
}
