//! Persistence model for the drug inventory: the `drugs` entity, its
//! validation rules and database connection helpers.

pub mod errors;
pub mod db;
pub mod drug;
