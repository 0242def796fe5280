use sea_orm::DbErr;
use thiserror::Error;

/// Failures of the store. Absence of a record is not an error; it is
/// reported as `Option::None` or `false` by the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("database error: {0}")]
    Db(String),
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self { Self::Db(e.to_string()) }
}
