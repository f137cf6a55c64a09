//! HTTP surface for the registry.
//!
//! - `GET /health` health check
//! - `ANY /{operation}` resolved through [`DispatchTable`]

mod error;
mod params;
mod rest;
mod routes;

pub use error::{status_for, ErrorBody, UnhandledOperation};
pub use params::RequestParams;
pub use rest::{router, serve, AppState};
pub use routes::{DispatchTable, Operation, Resource, Route};

#[cfg(test)]
mod tests;
