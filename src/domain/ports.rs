use crate::domain::model::{Coordinates, Product, Store};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Where store sets come from. Each call materializes a fresh set.
#[async_trait]
pub trait StoreSource: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Store>>;
    async fn search(&self, query: &str) -> Result<Vec<Store>>;
}

/// Resolves an image reference to raw bytes.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, image_ref: &str) -> Result<Vec<u8>>;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn image_base_url(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> Option<u64>;
    fn concurrent_fetches(&self) -> usize;
}

/// A map marker for one store.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub title: String,
    pub coordinates: Coordinates,
}

impl From<&Store> for Pin {
    fn from(store: &Store) -> Self {
        Self {
            title: store.name().to_string(),
            coordinates: store.coordinates(),
        }
    }
}

/// Implemented by the presentation layer; receives the pins to draw.
pub trait MapSurface: Send {
    fn show_pins(&mut self, pins: &[Pin]);
}

pub trait MapEventSink {
    fn pin_selected(&self, title: &str);
}

#[async_trait]
pub trait SearchEventSink {
    async fn search_submitted(&self, text: &str) -> Result<()>;
    fn search_cancelled(&self);
}

/// Row access for the product list of the selected store.
pub trait CatalogDataSource {
    fn row_count(&self) -> usize;
    fn product_at(&self, row: usize) -> Option<Product>;
    fn selected_store(&self) -> Option<String>;
}
