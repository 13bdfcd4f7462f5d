use crate::core::{CatalogDataSource, DirectoryView, Product};
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Default, Clone)]
struct Selected {
    store: Option<String>,
    products: Vec<Product>,
}

/// Product list of the store picked on the map, resolved against the view
/// that was on display when it was picked.
#[derive(Debug, Default)]
pub struct CatalogSelection {
    selected: RwLock<Selected>,
}

impl CatalogSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of products now selected. A store missing from
    /// `view` clears the selection.
    pub fn select(&self, store_name: &str, view: &DirectoryView) -> usize {
        let next = match view.find_by_name(store_name) {
            Some(store) => Selected {
                store: Some(store.name().to_string()),
                products: store.products().to_vec(),
            },
            None => {
                tracing::debug!(
                    "Store '{}' not in current view ({}), clearing catalog",
                    store_name,
                    view.provenance
                );
                Selected::default()
            }
        };

        let count = next.products.len();
        *self.selected.write().unwrap_or_else(PoisonError::into_inner) = next;
        count
    }

    pub fn clear(&self) {
        *self.selected.write().unwrap_or_else(PoisonError::into_inner) = Selected::default();
    }

    pub fn products(&self) -> Vec<Product> {
        self.selected
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .products
            .clone()
    }
}

impl CatalogDataSource for CatalogSelection {
    fn row_count(&self) -> usize {
        self.selected
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .products
            .len()
    }

    fn product_at(&self, row: usize) -> Option<Product> {
        self.selected
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .products
            .get(row)
            .cloned()
    }

    fn selected_store(&self) -> Option<String> {
        self.selected
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .store
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Coordinates, Store};
    use crate::domain::view::Provenance;

    fn view() -> DirectoryView {
        let acme = Store::new(
            "Acme",
            Coordinates::new(48.85, 2.35).unwrap(),
            vec![
                Product::new("Widget A", "img/a.png").unwrap(),
                Product::new("Widget B", "img/b.png").unwrap(),
            ],
        )
        .unwrap();
        let empty = Store::new("Empty", Coordinates::new(1.0, 1.0).unwrap(), vec![]).unwrap();
        DirectoryView::new(vec![acme, empty], Provenance::ListAll, 1)
    }

    #[test]
    fn test_select_exposes_rows_in_catalog_order() {
        let catalog = CatalogSelection::new();
        assert_eq!(catalog.select("Acme", &view()), 2);

        assert_eq!(catalog.row_count(), 2);
        assert_eq!(catalog.product_at(0).unwrap().name(), "Widget A");
        assert_eq!(catalog.product_at(1).unwrap().image_ref(), "img/b.png");
        assert!(catalog.product_at(2).is_none());
        assert_eq!(catalog.selected_store().as_deref(), Some("Acme"));
    }

    #[test]
    fn test_store_without_products() {
        let catalog = CatalogSelection::new();
        assert_eq!(catalog.select("Empty", &view()), 0);
        assert_eq!(catalog.selected_store().as_deref(), Some("Empty"));
    }

    #[test]
    fn test_missing_store_clears_selection() {
        let catalog = CatalogSelection::new();
        catalog.select("Acme", &view());

        assert_eq!(catalog.select("Gone", &view()), 0);
        assert_eq!(catalog.row_count(), 0);
        assert!(catalog.selected_store().is_none());
    }

    #[test]
    fn test_selection_follows_the_given_view() {
        let catalog = CatalogSelection::new();
        catalog.select("Acme", &view());

        let newer = DirectoryView::new(vec![], Provenance::Search("zzz".to_string()), 2);
        catalog.select("Acme", &newer);
        assert_eq!(catalog.row_count(), 0);
    }
}
