use crate::core::{Result, Store, StoreSource};

/// Listing and name search over a [`StoreSource`]. Every call goes to the
/// source; nothing is filtered from an earlier result.
pub struct DirectoryService<S: StoreSource> {
    source: S,
}

impl<S: StoreSource> DirectoryService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn list_all(&self) -> Result<Vec<Store>> {
        tracing::debug!("Listing all stores");
        let stores = self.source.list_all().await?;
        tracing::info!("📍 Directory returned {} stores", stores.len());
        Ok(stores)
    }

    /// An empty (or blank) query yields no stores and never reaches the source.
    pub async fn search(&self, query: &str) -> Result<Vec<Store>> {
        let query = query.trim();
        if query.is_empty() {
            tracing::debug!("Empty search query, returning no stores");
            return Ok(Vec::new());
        }

        tracing::debug!("Searching stores for '{}'", query);
        let stores = self.source.search(query).await?;
        tracing::info!("🔎 Search '{}' matched {} stores", query, stores.len());
        Ok(stores)
    }
}
