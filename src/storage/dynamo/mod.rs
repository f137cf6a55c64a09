//! DynamoDB storage implementation.

mod table_store;

pub use table_store::DynamoTableStore;
