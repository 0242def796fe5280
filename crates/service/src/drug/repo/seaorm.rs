use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use uuid::Uuid;

use models::drug::Drug;
use crate::db::drug_store;
use crate::drug::repository::{DrugRepository, DrugStore, DrugTransaction};
use crate::errors::ServiceError;

/// SeaORM-backed repository; autocommit operations run on the pool.
#[derive(Clone)]
pub struct SeaOrmDrugRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmDrugRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

/// Open database transaction; rolled back on drop unless committed.
pub struct SeaOrmDrugTransaction {
    txn: DatabaseTransaction,
}

macro_rules! delegate_drug_store {
    ($ty:ty, $conn:ident) => {
        #[async_trait]
        impl DrugStore for $ty {
            async fn save(&self, drug: &Drug) -> Result<Drug, ServiceError> {
                drug_store::save(&self.$conn, drug).await
            }

            async fn save_all(&self, drugs: Vec<Drug>) -> Result<Vec<Drug>, ServiceError> {
                drug_store::save_all(&self.$conn, drugs).await
            }

            async fn find_by_id(&self, uid: Uuid) -> Result<Option<Drug>, ServiceError> {
                drug_store::find_by_id(&self.$conn, uid).await
            }

            async fn find_all(&self) -> Result<Vec<Drug>, ServiceError> {
                drug_store::find_all(&self.$conn).await
            }

            async fn find_by_manufacturer(&self, manufacturer: &str) -> Result<Vec<Drug>, ServiceError> {
                drug_store::find_by_manufacturer(&self.$conn, manufacturer).await
            }

            async fn find_by_name_containing(&self, fragment: &str) -> Result<Vec<Drug>, ServiceError> {
                drug_store::find_by_name_containing(&self.$conn, fragment).await
            }

            async fn find_by_price_less_or_equal(&self, max: Decimal) -> Result<Vec<Drug>, ServiceError> {
                drug_store::find_by_price_less_or_equal(&self.$conn, max).await
            }

            async fn delete(&self, drug: &Drug) -> Result<bool, ServiceError> {
                drug_store::delete(&self.$conn, drug).await
            }
        }
    };
}

delegate_drug_store!(SeaOrmDrugRepository, db);
delegate_drug_store!(SeaOrmDrugTransaction, txn);

#[async_trait]
impl DrugRepository for SeaOrmDrugRepository {
    type Tx = SeaOrmDrugTransaction;

    async fn begin(&self) -> Result<SeaOrmDrugTransaction, ServiceError> {
        let txn = self.db.begin().await?;
        Ok(SeaOrmDrugTransaction { txn })
    }
}

#[async_trait]
impl DrugTransaction for SeaOrmDrugTransaction {
    async fn commit(self) -> Result<(), ServiceError> {
        self.txn.commit().await?;
        Ok(())
    }
}
