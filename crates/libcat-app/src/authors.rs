use libcat_dal::author::AuthorRepository;
use libcat_dal::error::Result;
use libcat_dal::{Filter, Order, Pool};

/// Query service over the author collection. Storage is injected at
/// construction; every call either completes with data or fails with the
/// storage error. Converting failures to an empty-looking response is the
/// request handler's business, not this layer's.
pub struct AuthorService {
    repository: AuthorRepository,
}

impl AuthorService {
    pub fn new(pool: Pool) -> Self {
        Self {
            repository: AuthorRepository::new(pool),
        }
    }

    /// Lists authors as display strings, `"<name> : <lifespan>"`. The
    /// projection happens here, after retrieval, so an empty result and a
    /// storage failure stay distinguishable.
    pub async fn list(&self, order: Option<Order>) -> Result<Vec<String>> {
        let authors = self.repository.list(order).await?;
        Ok(authors.iter().map(|a| a.display()).collect())
    }

    pub async fn count(&self, filter: &Filter) -> Result<u64> {
        self.repository.count(filter).await
    }

    pub async fn find_id_by_name(
        &self,
        family_name: &str,
        first_name: &str,
    ) -> Result<Option<i64>> {
        self.repository.find_id_by_name(family_name, first_name).await
    }
}
