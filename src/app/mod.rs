pub mod locator;

pub use locator::{MapEvents, SearchEvents, StoreLocator};
