//! Service layer: storage sessions, the generic entity service and the
//! catalog built from it.
//! - `entity` holds the reusable Create/Get/List/Delete machinery.
//! - `convert` maps loaded rows to `catalog.v1` messages.
//! - `catalog` wires one service per entity kind.

pub mod errors;
pub mod session;
pub mod entity;
pub mod convert;
pub mod catalog;
pub mod seed;
#[cfg(test)]
pub mod test_support;

pub use catalog::Catalog;
pub use errors::ServiceError;

#[cfg(test)]
mod tests;
