//! Abstract interfaces for registry components.
//!
//! These traits define the contracts for:
//! - Table storage (point reads, upserts, deletes and prefix listings)

pub mod table_store;

pub use table_store::{item_key, AttributeFilter, Contains, Item, Result, StorageError, TableStore};
