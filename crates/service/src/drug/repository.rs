use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use models::drug::Drug;
use crate::errors::ServiceError;

/// Store access operations on drug records. Implementations pass straight
/// through to the backing store: no caching, no retry.
#[async_trait]
pub trait DrugStore: Send + Sync {
    /// Insert, or overwrite the business fields of the record with the same uid.
    async fn save(&self, drug: &Drug) -> Result<Drug, ServiceError>;
    /// Persist every record as one batch; a failure stores none of them.
    async fn save_all(&self, drugs: Vec<Drug>) -> Result<Vec<Drug>, ServiceError>;
    async fn find_by_id(&self, uid: Uuid) -> Result<Option<Drug>, ServiceError>;
    async fn find_all(&self) -> Result<Vec<Drug>, ServiceError>;
    async fn find_by_manufacturer(&self, manufacturer: &str) -> Result<Vec<Drug>, ServiceError>;
    /// Case-insensitive substring match on the name.
    async fn find_by_name_containing(&self, fragment: &str) -> Result<Vec<Drug>, ServiceError>;
    /// Price at or below `max`.
    async fn find_by_price_less_or_equal(&self, max: Decimal) -> Result<Vec<Drug>, ServiceError>;
    /// Hard delete; true if a record was removed.
    async fn delete(&self, drug: &Drug) -> Result<bool, ServiceError>;
}

/// Unit of work over a [`DrugStore`]. Dropping it without `commit` discards
/// its writes.
#[async_trait]
pub trait DrugTransaction: DrugStore + Sized {
    async fn commit(self) -> Result<(), ServiceError>;
}

/// Entry point of the store: autocommit operations plus transactions.
#[async_trait]
pub trait DrugRepository: DrugStore {
    type Tx: DrugTransaction;

    async fn begin(&self) -> Result<Self::Tx, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::{BTreeMap, HashSet};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    type Table = BTreeMap<Uuid, Drug>;

    fn matching(table: &Table, pred: impl Fn(&Drug) -> bool) -> Vec<Drug> {
        table.values().filter(|d| pred(d)).cloned().collect()
    }

    fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }

    // the relational store refuses to touch the same row twice in one statement
    fn check_batch(drugs: &[Drug]) -> Result<(), ServiceError> {
        let mut seen = HashSet::new();
        for d in drugs {
            if !seen.insert(d.uid) {
                return Err(ServiceError::Db(format!("duplicate uid {} in batch", d.uid)));
            }
        }
        Ok(())
    }

    /// Shared table; every operation autocommits.
    #[derive(Clone, Default)]
    pub struct MockDrugRepository {
        rows: Arc<Mutex<Table>>,
    }

    impl MockDrugRepository {
        pub fn new() -> Self { Self::default() }

        pub async fn len(&self) -> usize { self.rows.lock().await.len() }

        pub async fn is_empty(&self) -> bool { self.rows.lock().await.is_empty() }
    }

    #[async_trait]
    impl DrugStore for MockDrugRepository {
        async fn save(&self, drug: &Drug) -> Result<Drug, ServiceError> {
            self.rows.lock().await.insert(drug.uid, drug.clone());
            Ok(drug.clone())
        }

        async fn save_all(&self, drugs: Vec<Drug>) -> Result<Vec<Drug>, ServiceError> {
            check_batch(&drugs)?;
            let mut rows = self.rows.lock().await;
            for d in &drugs {
                rows.insert(d.uid, d.clone());
            }
            Ok(drugs)
        }

        async fn find_by_id(&self, uid: Uuid) -> Result<Option<Drug>, ServiceError> {
            Ok(self.rows.lock().await.get(&uid).cloned())
        }

        async fn find_all(&self) -> Result<Vec<Drug>, ServiceError> {
            Ok(matching(&*self.rows.lock().await, |_| true))
        }

        async fn find_by_manufacturer(&self, manufacturer: &str) -> Result<Vec<Drug>, ServiceError> {
            Ok(matching(&*self.rows.lock().await, |d| d.manufacturer == manufacturer))
        }

        async fn find_by_name_containing(&self, fragment: &str) -> Result<Vec<Drug>, ServiceError> {
            Ok(matching(&*self.rows.lock().await, |d| contains_ignore_case(&d.name, fragment)))
        }

        async fn find_by_price_less_or_equal(&self, max: Decimal) -> Result<Vec<Drug>, ServiceError> {
            Ok(matching(&*self.rows.lock().await, |d| d.price <= max))
        }

        async fn delete(&self, drug: &Drug) -> Result<bool, ServiceError> {
            Ok(self.rows.lock().await.remove(&drug.uid).is_some())
        }
    }

    #[async_trait]
    impl DrugRepository for MockDrugRepository {
        type Tx = MockDrugTransaction;

        async fn begin(&self) -> Result<MockDrugTransaction, ServiceError> {
            let view = self.rows.lock().await.clone();
            Ok(MockDrugTransaction {
                staged: Mutex::new(Staged { view, writes: Vec::new() }),
                target: Arc::clone(&self.rows),
            })
        }
    }

    enum Write {
        Put(Drug),
        Remove(Uuid),
    }

    struct Staged {
        view: Table,
        writes: Vec<Write>,
    }

    /// Reads see a snapshot taken at `begin` plus this transaction's own
    /// writes; `commit` replays the writes onto the shared table.
    pub struct MockDrugTransaction {
        staged: Mutex<Staged>,
        target: Arc<Mutex<Table>>,
    }

    #[async_trait]
    impl DrugStore for MockDrugTransaction {
        async fn save(&self, drug: &Drug) -> Result<Drug, ServiceError> {
            let mut staged = self.staged.lock().await;
            staged.view.insert(drug.uid, drug.clone());
            staged.writes.push(Write::Put(drug.clone()));
            Ok(drug.clone())
        }

        async fn save_all(&self, drugs: Vec<Drug>) -> Result<Vec<Drug>, ServiceError> {
            check_batch(&drugs)?;
            let mut staged = self.staged.lock().await;
            for d in &drugs {
                staged.view.insert(d.uid, d.clone());
                staged.writes.push(Write::Put(d.clone()));
            }
            Ok(drugs)
        }

        async fn find_by_id(&self, uid: Uuid) -> Result<Option<Drug>, ServiceError> {
            Ok(self.staged.lock().await.view.get(&uid).cloned())
        }

        async fn find_all(&self) -> Result<Vec<Drug>, ServiceError> {
            Ok(matching(&self.staged.lock().await.view, |_| true))
        }

        async fn find_by_manufacturer(&self, manufacturer: &str) -> Result<Vec<Drug>, ServiceError> {
            Ok(matching(&self.staged.lock().await.view, |d| d.manufacturer == manufacturer))
        }

        async fn find_by_name_containing(&self, fragment: &str) -> Result<Vec<Drug>, ServiceError> {
            Ok(matching(&self.staged.lock().await.view, |d| contains_ignore_case(&d.name, fragment)))
        }

        async fn find_by_price_less_or_equal(&self, max: Decimal) -> Result<Vec<Drug>, ServiceError> {
            Ok(matching(&self.staged.lock().await.view, |d| d.price <= max))
        }

        async fn delete(&self, drug: &Drug) -> Result<bool, ServiceError> {
            let mut staged = self.staged.lock().await;
            let removed = staged.view.remove(&drug.uid).is_some();
            if removed {
                staged.writes.push(Write::Remove(drug.uid));
            }
            Ok(removed)
        }
    }

    #[async_trait]
    impl DrugTransaction for MockDrugTransaction {
        async fn commit(self) -> Result<(), ServiceError> {
            let staged = self.staged.into_inner();
            let mut rows = self.target.lock().await;
            for w in staged.writes {
                match w {
                    Write::Put(d) => { rows.insert(d.uid, d); }
                    Write::Remove(uid) => { rows.remove(&uid); }
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockDrugRepository;
    use super::*;
    use models::drug::DrugFields;

    fn drug(name: &str) -> Drug {
        Drug::from_fields(Uuid::new_v4(), DrugFields::new("PharmaCorp", name, 1, Decimal::ONE).unwrap())
    }

    #[tokio::test]
    async fn uncommitted_transaction_is_discarded() {
        let repo = MockDrugRepository::new();
        {
            let tx = repo.begin().await.unwrap();
            tx.save(&drug("Aspirin")).await.unwrap();
            assert_eq!(tx.find_all().await.unwrap().len(), 1);
        }
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn commit_replays_writes() {
        let repo = MockDrugRepository::new();
        let keep = repo.save(&drug("Keep")).await.unwrap();
        let gone = repo.save(&drug("Gone")).await.unwrap();

        let tx = repo.begin().await.unwrap();
        tx.save(&drug("New")).await.unwrap();
        assert!(tx.delete(&gone).await.unwrap());
        tx.commit().await.unwrap();

        assert_eq!(repo.len().await, 2);
        assert!(repo.find_by_id(keep.uid).await.unwrap().is_some());
        assert!(repo.find_by_id(gone.uid).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn batch_with_repeated_uid_fails_whole() {
        let repo = MockDrugRepository::new();
        let d = drug("Twice");
        let res = repo.save_all(vec![d.clone(), d]).await;
        assert!(matches!(res, Err(ServiceError::Db(_))));
        assert!(repo.is_empty().await);
    }
}
