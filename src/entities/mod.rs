//! Record shapes stored in the registry table.
//!
//! Each shape carries its storage key in `pk`/`sk`. In a request body those
//! two attributes hold the caller's untagged identifiers; [`TableEntity::reference`]
//! reads them and the repository replaces them with the canonical tagged key
//! before writing.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::keys::{EntityKind, EntityRef, StorageKey};

mod fundraiser;
mod ngo;
mod update;

pub use fundraiser::{Fundraiser, FundraiserDetails, FundraiserIndividual, FundraiserNgo};
pub use ngo::Ngo;
pub use update::Update;

/// A record shape bound to one entity kind of the key scheme.
pub trait TableEntity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Kind of record this shape represents.
    const KIND: EntityKind;

    /// Reference named by the identifiers a request body carries in `pk`/`sk`.
    ///
    /// Returns `None` when those identifiers cannot address this kind.
    fn reference(&self) -> Option<EntityRef>;

    /// Stored sort key. Empty for a body that never had a key assigned.
    fn sort_key(&self) -> &str;

    /// Overwrite the key attributes.
    fn assign_key(&mut self, key: StorageKey);
}
