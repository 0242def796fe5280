use std::sync::Arc;

use service::drug::{repository::DrugRepository, DrugService};

/// Shared handler state. Generic over the store so that tests can run the
/// full router on the in-memory repository.
pub struct ServerState<R: DrugRepository> {
    pub drugs: Arc<DrugService<R>>,
}

impl<R: DrugRepository> ServerState<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { drugs: Arc::new(DrugService::new(repo)) }
    }
}

// derive(Clone) would demand R: Clone
impl<R: DrugRepository> Clone for ServerState<R> {
    fn clone(&self) -> Self {
        Self { drugs: Arc::clone(&self.drugs) }
    }
}
