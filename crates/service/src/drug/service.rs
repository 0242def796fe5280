use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use models::drug::{Drug, DrugFields, NewDrug};
use crate::drug::repository::{DrugRepository, DrugStore, DrugTransaction};
use crate::errors::ServiceError;

/// Drug business service independent of web framework.
///
/// Writes run inside one transaction per call; reads go straight to the store.
pub struct DrugService<R: DrugRepository> {
    repo: Arc<R>,
}

fn assign_uid(new: NewDrug) -> Drug {
    let uid = new.uid.unwrap_or_else(Uuid::new_v4);
    Drug::from_fields(uid, new.fields)
}

impl<R: DrugRepository> DrugService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create a drug, generating its uid when the caller did not supply one.
    ///
    /// # Examples
    /// ```
    /// use service::drug::{DrugService, repository::mock::MockDrugRepository};
    /// use models::drug::{DrugFields, NewDrug};
    /// use rust_decimal::Decimal;
    /// use std::sync::Arc;
    /// let svc = DrugService::new(Arc::new(MockDrugRepository::default()));
    /// let fields = DrugFields::new("PharmaCorp", "Aspirin", 500, Decimal::new(999, 2)).unwrap();
    /// let drug = tokio_test::block_on(svc.create_drug(NewDrug { uid: None, fields })).unwrap();
    /// assert_eq!(drug.name, "Aspirin");
    /// assert!(!drug.uid.is_nil());
    /// ```
    #[instrument(skip(self, new))]
    pub async fn create_drug(&self, new: NewDrug) -> Result<Drug, ServiceError> {
        let drug = assign_uid(new);
        let tx = self.repo.begin().await?;
        let saved = tx.save(&drug).await?;
        tx.commit().await?;
        info!(uid = %saved.uid, name = %saved.name, "drug_created");
        Ok(saved)
    }

    /// Create all drugs in one transaction; any failure stores none of them.
    #[instrument(skip(self, batch), fields(count = batch.len()))]
    pub async fn create_drugs(&self, batch: Vec<NewDrug>) -> Result<Vec<Drug>, ServiceError> {
        let drugs: Vec<Drug> = batch.into_iter().map(assign_uid).collect();
        let tx = self.repo.begin().await?;
        let saved = tx.save_all(drugs).await?;
        tx.commit().await?;
        info!(count = saved.len(), "drugs_created");
        Ok(saved)
    }

    pub async fn get_drug_by_uid(&self, uid: Uuid) -> Result<Option<Drug>, ServiceError> {
        self.repo.find_by_id(uid).await
    }

    pub async fn get_all_drugs(&self) -> Result<Vec<Drug>, ServiceError> {
        self.repo.find_all().await
    }

    pub async fn get_drugs_by_manufacturer(&self, manufacturer: &str) -> Result<Vec<Drug>, ServiceError> {
        self.repo.find_by_manufacturer(manufacturer).await
    }

    /// Case-insensitive substring search on the drug name.
    pub async fn get_drugs_by_name(&self, name: &str) -> Result<Vec<Drug>, ServiceError> {
        self.repo.find_by_name_containing(name).await
    }

    /// Drugs priced at or below `max_price`.
    pub async fn get_drugs_by_max_price(&self, max_price: Decimal) -> Result<Vec<Drug>, ServiceError> {
        self.repo.find_by_price_less_or_equal(max_price).await
    }

    /// Overwrite the four business fields; `None` when no drug has this uid.
    #[instrument(skip(self, fields))]
    pub async fn update_drug(&self, uid: Uuid, fields: DrugFields) -> Result<Option<Drug>, ServiceError> {
        let tx = self.repo.begin().await?;
        let Some(existing) = tx.find_by_id(uid).await? else {
            debug!("update of unknown drug");
            return Ok(None);
        };
        let saved = tx.save(&existing.with_fields(fields)).await?;
        tx.commit().await?;
        info!(uid = %saved.uid, "drug_updated");
        Ok(Some(saved))
    }

    /// Hard delete; `false` when no drug has this uid.
    #[instrument(skip(self))]
    pub async fn delete_drug(&self, uid: Uuid) -> Result<bool, ServiceError> {
        let tx = self.repo.begin().await?;
        let Some(existing) = tx.find_by_id(uid).await? else {
            debug!("delete of unknown drug");
            return Ok(false);
        };
        let removed = tx.delete(&existing).await?;
        tx.commit().await?;
        if removed {
            info!(uid = %uid, "drug_deleted");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drug::repository::mock::MockDrugRepository;
    use std::str::FromStr;

    fn price(s: &str) -> Decimal { Decimal::from_str(s).unwrap() }

    fn fields(manufacturer: &str, name: &str, quantity: i64, p: &str) -> DrugFields {
        DrugFields::new(manufacturer, name, quantity, price(p)).unwrap()
    }

    fn new_drug(name: &str, p: &str) -> NewDrug {
        NewDrug { uid: None, fields: fields("PharmaCorp", name, 500, p) }
    }

    fn service() -> (DrugService<MockDrugRepository>, MockDrugRepository) {
        let repo = MockDrugRepository::new();
        (DrugService::new(Arc::new(repo.clone())), repo)
    }

    #[tokio::test]
    async fn create_assigns_unique_uids_and_keeps_fields() {
        let (svc, _) = service();
        let a = svc.create_drug(new_drug("Aspirin", "9.99")).await.unwrap();
        let b = svc.create_drug(new_drug("Aspirin", "9.99")).await.unwrap();
        assert!(!a.uid.is_nil());
        assert_ne!(a.uid, b.uid);
        assert_eq!(a.manufacturer, "PharmaCorp");
        assert_eq!(a.name, "Aspirin");
        assert_eq!(a.quantity, 500);
        assert_eq!(a.price, price("9.99"));
    }

    #[tokio::test]
    async fn create_keeps_caller_uid() {
        let (svc, _) = service();
        let uid = Uuid::new_v4();
        let created = svc
            .create_drug(NewDrug { uid: Some(uid), fields: fields("PharmaCorp", "Aspirin", 1, "1") })
            .await
            .unwrap();
        assert_eq!(created.uid, uid);
    }

    #[tokio::test]
    async fn created_then_fetched_is_identical() {
        let (svc, _) = service();
        let created = svc.create_drug(new_drug("Aspirin", "9.99")).await.unwrap();
        let fetched = svc.get_drug_by_uid(created.uid).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn batch_create_assigns_uids_per_element() {
        let (svc, repo) = service();
        let fixed = Uuid::new_v4();
        let batch = vec![
            new_drug("Aspirin", "1"),
            NewDrug { uid: Some(fixed), fields: fields("Bayer", "Ibuprofen", 2, "2") },
        ];
        let created = svc.create_drugs(batch).await.unwrap();
        assert_eq!(created.len(), 2);
        assert!(!created[0].uid.is_nil());
        assert_eq!(created[1].uid, fixed);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn failing_batch_stores_nothing() {
        let (svc, repo) = service();
        let uid = Uuid::new_v4();
        let batch = vec![
            NewDrug { uid: Some(uid), fields: fields("A", "One", 1, "1") },
            new_drug("Two", "2"),
            NewDrug { uid: Some(uid), fields: fields("A", "Three", 3, "3") },
        ];
        assert!(svc.create_drugs(batch).await.is_err());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn update_missing_uid_is_noop() {
        let (svc, repo) = service();
        svc.create_drug(new_drug("Aspirin", "9.99")).await.unwrap();
        let res = svc.update_drug(Uuid::new_v4(), fields("X", "Y", 1, "1")).await.unwrap();
        assert!(res.is_none());
        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Aspirin");
    }

    #[tokio::test]
    async fn update_overwrites_business_fields_only() {
        let (svc, _) = service();
        let created = svc.create_drug(new_drug("Aspirin", "9.99")).await.unwrap();
        let updated = svc
            .update_drug(created.uid, fields("Bayer", "Aspirin Forte", 42, "12.34"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.uid, created.uid);
        assert_eq!(updated.manufacturer, "Bayer");
        assert_eq!(updated.name, "Aspirin Forte");
        assert_eq!(updated.quantity, 42);
        assert_eq!(updated.price, price("12.34"));
        assert_eq!(svc.get_drug_by_uid(created.uid).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn delete_existing_then_fetch_is_absent() {
        let (svc, _) = service();
        let created = svc.create_drug(new_drug("Aspirin", "9.99")).await.unwrap();
        assert!(svc.delete_drug(created.uid).await.unwrap());
        assert!(svc.get_drug_by_uid(created.uid).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_missing_uid_leaves_store_unchanged() {
        let (svc, repo) = service();
        svc.create_drug(new_drug("Aspirin", "9.99")).await.unwrap();
        assert!(!svc.delete_drug(Uuid::new_v4()).await.unwrap());
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn name_search_is_case_insensitive_substring() {
        let (svc, _) = service();
        svc.create_drug(new_drug("Aspirin", "1")).await.unwrap();
        svc.create_drug(new_drug("aspirin-extra", "1")).await.unwrap();
        svc.create_drug(new_drug("Ibuprofen", "1")).await.unwrap();
        let mut names: Vec<_> = svc
            .get_drugs_by_name("ASP")
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Aspirin", "aspirin-extra"]);
    }

    #[tokio::test]
    async fn max_price_filter_is_inclusive() {
        let (svc, _) = service();
        svc.create_drug(new_drug("Cheap", "5.00")).await.unwrap();
        svc.create_drug(new_drug("Exact", "9.99")).await.unwrap();
        svc.create_drug(new_drug("Dear", "10.00")).await.unwrap();
        let hits = svc.get_drugs_by_max_price(price("9.99")).await.unwrap();
        let mut names: Vec<_> = hits.into_iter().map(|d| d.name).collect();
        names.sort();
        assert_eq!(names, vec!["Cheap", "Exact"]);
    }

    #[tokio::test]
    async fn manufacturer_lookup_is_exact() {
        let (svc, _) = service();
        svc.create_drug(NewDrug { uid: None, fields: fields("Bayer", "A", 1, "1") }).await.unwrap();
        svc.create_drug(NewDrug { uid: None, fields: fields("bayer", "B", 1, "1") }).await.unwrap();
        let hits = svc.get_drugs_by_manufacturer("Bayer").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "A");
        assert_eq!(svc.get_all_drugs().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn seaorm_service_roundtrip() -> Result<(), anyhow::Error> {
        use crate::drug::repo::seaorm::SeaOrmDrugRepository;
        use crate::test_support::get_db;

        let Some(db) = get_db().await? else { return Ok(()) };
        let svc = DrugService::new(Arc::new(SeaOrmDrugRepository::new(db)));

        let created = svc.create_drug(new_drug("Aspirin", "9.99")).await?;
        assert_eq!(svc.get_drug_by_uid(created.uid).await?, Some(created.clone()));

        let updated = svc.update_drug(created.uid, fields("Bayer", "Aspirin", 1, "9.98")).await?.unwrap();
        assert_eq!(updated.uid, created.uid);
        assert!(svc.update_drug(Uuid::new_v4(), fields("X", "Y", 1, "1")).await?.is_none());

        assert!(svc.delete_drug(created.uid).await?);
        assert!(!svc.delete_drug(created.uid).await?);
        assert!(svc.get_drug_by_uid(created.uid).await?.is_none());
        Ok(())
    }
}
