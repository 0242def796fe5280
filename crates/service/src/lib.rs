//! Service layer for the drug inventory.
//! - `drug::repository` defines the store access traits and an in-memory mock.
//! - `drug::repo::seaorm` implements them over a SeaORM connection.
//! - `drug::service` assigns identifiers, scopes transactions and delegates to the store.

pub mod errors;
pub mod db;
pub mod drug;
#[cfg(test)]
pub mod test_support;
