//! SeaORM queries against the `drugs` table.
//!
//! Every function is generic over [`ConnectionTrait`] so the same query runs on
//! the pool or inside a transaction.

use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func, LikeExpr, OnConflict};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use models::drug::{self, Drug};
use crate::errors::ServiceError;

fn overwrite_on_conflict() -> OnConflict {
    OnConflict::column(drug::Column::Uid)
        .update_columns([
            drug::Column::Manufacturer,
            drug::Column::Name,
            drug::Column::Quantity,
            drug::Column::Price,
        ])
        .to_owned()
}

/// Escape LIKE metacharacters so the fragment matches literally.
pub fn escape_like(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Insert, or overwrite the business columns of the row with the same uid.
pub async fn save<C: ConnectionTrait>(conn: &C, drug: &Drug) -> Result<Drug, ServiceError> {
    let saved = drug::Entity::insert(drug.to_active_model())
        .on_conflict(overwrite_on_conflict())
        .exec_with_returning(conn)
        .await?;
    Ok(saved)
}

/// Persist the whole list in a single statement.
pub async fn save_all<C: ConnectionTrait>(conn: &C, drugs: Vec<Drug>) -> Result<Vec<Drug>, ServiceError> {
    if drugs.is_empty() {
        return Ok(drugs);
    }
    drug::Entity::insert_many(drugs.iter().map(Drug::to_active_model))
        .on_conflict(overwrite_on_conflict())
        .exec_without_returning(conn)
        .await?;
    Ok(drugs)
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, uid: Uuid) -> Result<Option<Drug>, ServiceError> {
    Ok(drug::Entity::find_by_id(uid).one(conn).await?)
}

pub async fn find_all<C: ConnectionTrait>(conn: &C) -> Result<Vec<Drug>, ServiceError> {
    Ok(drug::Entity::find().all(conn).await?)
}

pub async fn find_by_manufacturer<C: ConnectionTrait>(conn: &C, manufacturer: &str) -> Result<Vec<Drug>, ServiceError> {
    let rows = drug::Entity::find()
        .filter(drug::Column::Manufacturer.eq(manufacturer))
        .all(conn)
        .await?;
    Ok(rows)
}

/// Case-insensitive substring match on `name`.
pub async fn find_by_name_containing<C: ConnectionTrait>(conn: &C, fragment: &str) -> Result<Vec<Drug>, ServiceError> {
    let pattern = format!("%{}%", escape_like(&fragment.to_lowercase()));
    let rows = drug::Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(drug::Column::Name))).like(LikeExpr::new(pattern).escape('\\')))
        .all(conn)
        .await?;
    Ok(rows)
}

/// Price at or below `max`.
pub async fn find_by_price_less_or_equal<C: ConnectionTrait>(conn: &C, max: Decimal) -> Result<Vec<Drug>, ServiceError> {
    let rows = drug::Entity::find()
        .filter(drug::Column::Price.lte(max))
        .all(conn)
        .await?;
    Ok(rows)
}

/// Hard delete; true if a row was removed.
pub async fn delete<C: ConnectionTrait>(conn: &C, drug: &Drug) -> Result<bool, ServiceError> {
    let res = drug::Entity::delete_by_id(drug.uid).exec(conn).await?;
    Ok(res.rows_affected > 0)
}
