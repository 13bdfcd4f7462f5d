use crate::core::{Product, Result, Store};
use crate::utils::error::LocatorError;
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(LocatorError::InvalidConfigValueError {
                field: "output.format".to_string(),
                value: other.to_string(),
                reason: "Unsupported format. Valid formats: table, json, csv".to_string(),
            }),
        }
    }
}

#[derive(Serialize)]
struct StoreRow<'a> {
    name: &'a str,
    lat: f64,
    lon: f64,
    product_count: usize,
}

impl<'a> From<&'a Store> for StoreRow<'a> {
    fn from(store: &'a Store) -> Self {
        Self {
            name: store.name(),
            lat: store.coordinates().latitude(),
            lon: store.coordinates().longitude(),
            product_count: store.products().len(),
        }
    }
}

pub fn render(stores: &[Store], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(to_table(stores)),
        OutputFormat::Json => to_json(stores),
        OutputFormat::Csv => to_csv(stores),
    }
}

/// Catalog of one store, in catalog order.
pub fn render_products(products: &[Product], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(products)?),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(["name", "imageRef"])?;
            for product in products {
                writer.write_record([product.name(), product.image_ref()])?;
            }
            into_string(writer)
        }
        OutputFormat::Table => Ok(products
            .iter()
            .map(|p| format!("{}\t{}", p.name(), p.image_ref()))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

pub fn to_json(stores: &[Store]) -> Result<String> {
    Ok(serde_json::to_string_pretty(stores)?)
}

pub fn to_csv(stores: &[Store]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for store in stores {
        writer.serialize(StoreRow::from(store))?;
    }
    into_string(writer)
}

fn into_string(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| LocatorError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| LocatorError::ConfigError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

pub fn to_table(stores: &[Store]) -> String {
    let width = stores
        .iter()
        .map(|s| s.name().chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    let mut lines = vec![format!(
        "{:<width$}  {:>10}  {:>11}  {:>8}",
        "NAME",
        "LAT",
        "LON",
        "PRODUCTS",
        width = width
    )];
    for store in stores {
        lines.push(format!(
            "{:<width$}  {:>10.5}  {:>11.5}  {:>8}",
            store.name(),
            store.coordinates().latitude(),
            store.coordinates().longitude(),
            store.products().len(),
            width = width
        ));
    }
    lines.join("\n")
}
