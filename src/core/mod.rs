pub mod catalog;
pub mod directory;
pub mod export;
pub mod images;
pub mod session;

pub use crate::domain::model::{Coordinates, Product, Store};
pub use crate::domain::ports::{CatalogDataSource, ConfigProvider, ImageFetcher, StoreSource};
pub use crate::domain::view::{find_by_name, DirectoryView, Provenance};
pub use crate::utils::error::Result;

pub use catalog::CatalogSelection;
pub use directory::DirectoryService;
pub use images::ImageLoader;
pub use session::{DirectorySession, RequestOutcome};
