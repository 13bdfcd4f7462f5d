// Adapters layer: concrete store sources and image fetchers.

pub mod http;
pub mod memory;

pub use http::{HttpImageFetcher, HttpStoreSource};
pub use memory::InMemoryStoreSource;
