use crate::core::{Result, Store, StoreSource};
use async_trait::async_trait;
use std::path::Path;

/// A fixed store list, searched by case-insensitive name substring.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStoreSource {
    stores: Vec<Store>,
}

impl InMemoryStoreSource {
    pub fn new(stores: Vec<Store>) -> Self {
        Self { stores }
    }

    /// Parse a JSON array in the `GET /stores` wire shape.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let stores: Vec<Store> = serde_json::from_str(content)?;
        Ok(Self::new(stores))
    }

    pub async fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(&path).await?;
        let source = Self::from_json_str(&content)?;
        tracing::debug!(
            "Seeded {} stores from {}",
            source.stores.len(),
            path.as_ref().display()
        );
        Ok(source)
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }
}

#[async_trait]
impl StoreSource for InMemoryStoreSource {
    async fn list_all(&self) -> Result<Vec<Store>> {
        Ok(self.stores.clone())
    }

    async fn search(&self, query: &str) -> Result<Vec<Store>> {
        Ok(self
            .stores
            .iter()
            .filter(|store| store.name_matches(query))
            .cloned()
            .collect())
    }
}
