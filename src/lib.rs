pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{HttpImageFetcher, HttpStoreSource, InMemoryStoreSource};
pub use crate::app::StoreLocator;
pub use crate::core::{
    find_by_name, CatalogSelection, Coordinates, DirectoryService, DirectorySession,
    DirectoryView, ImageLoader, Product, Provenance, RequestOutcome, Store,
};
pub use crate::utils::error::{LocatorError, Result};
