//! Entity access operations.

mod entity;
mod error;

pub use entity::EntityRepository;
pub use error::OperationError;
