use crate::utils::error::{LocatorError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        validate_range("latitude", latitude, -90.0, 90.0).map_err(into_invalid_store)?;
        validate_range("longitude", longitude, -180.0, 180.0).map_err(into_invalid_store)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// A catalog entry. The image itself is resolved lazily through an
/// [`ImageFetcher`](crate::domain::ports::ImageFetcher).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord", into = "ProductRecord")]
pub struct Product {
    name: String,
    image_ref: String,
}

impl Product {
    pub fn new(name: impl Into<String>, image_ref: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_non_empty_string("product.name", &name).map_err(into_invalid_store)?;
        Ok(Self {
            name,
            image_ref: image_ref.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }
}

/// A store and its catalog, in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoreRecord", into = "StoreRecord")]
pub struct Store {
    name: String,
    coordinates: Coordinates,
    products: Vec<Product>,
}

impl Store {
    pub fn new(
        name: impl Into<String>,
        coordinates: Coordinates,
        products: Vec<Product>,
    ) -> Result<Self> {
        let name = name.into();
        validate_non_empty_string("store.name", &name).map_err(into_invalid_store)?;
        Ok(Self {
            name,
            coordinates,
            products,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Case-insensitive substring match on the store name.
    pub fn name_matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

fn into_invalid_store(err: LocatorError) -> LocatorError {
    match err {
        LocatorError::InvalidConfigValueError { field, reason, .. } => {
            LocatorError::invalid_store(format!("{}: {}", field, reason))
        }
        other => other,
    }
}

// Wire shapes: {name, lat, lon, products: [{name, imageRef}]}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    name: String,
    image_ref: String,
}

impl TryFrom<ProductRecord> for Product {
    type Error = LocatorError;

    fn try_from(record: ProductRecord) -> Result<Self> {
        Product::new(record.name, record.image_ref)
    }
}

impl From<Product> for ProductRecord {
    fn from(product: Product) -> Self {
        Self {
            name: product.name,
            image_ref: product.image_ref,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreRecord {
    name: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    products: Vec<Product>,
}

impl TryFrom<StoreRecord> for Store {
    type Error = LocatorError;

    fn try_from(record: StoreRecord) -> Result<Self> {
        let coordinates = Coordinates::new(record.lat, record.lon)?;
        Store::new(record.name, coordinates, record.products)
    }
}

impl From<Store> for StoreRecord {
    fn from(store: Store) -> Self {
        Self {
            name: store.name,
            lat: store.coordinates.latitude,
            lon: store.coordinates.longitude,
            products: store.products,
        }
    }
}
