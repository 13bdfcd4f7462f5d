use crate::core::{
    CatalogSelection, DirectoryService, DirectorySession, DirectoryView, RequestOutcome, Result,
    StoreSource,
};
use crate::domain::ports::{MapEventSink, MapSurface, Pin, SearchEventSink};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// The map plus the sequence number of the view it last drew.
struct Surface<M> {
    map: M,
    shown: u64,
}

struct Shared<S: StoreSource, M: MapSurface> {
    session: DirectorySession<S>,
    catalog: CatalogSelection,
    surface: Mutex<Surface<M>>,
    default_view: RwLock<Option<DirectoryView>>,
}

impl<S: StoreSource, M: MapSurface> Shared<S, M> {
    /// Draw `view` unless the map already shows a newer one.
    fn show(&self, view: &DirectoryView) {
        let mut surface = self.surface.lock().unwrap_or_else(PoisonError::into_inner);
        if view.sequence < surface.shown {
            tracing::debug!(
                "Skipping pins of #{} ({}), map already shows #{}",
                view.sequence,
                view.provenance,
                surface.shown
            );
            return;
        }

        let pins: Vec<Pin> = view.stores.iter().map(Pin::from).collect();
        tracing::debug!("Showing {} pins ({})", pins.len(), view.provenance);
        surface.shown = view.sequence;
        surface.map.show_pins(&pins);
    }

    fn default_view(&self) -> Option<DirectoryView> {
        self.default_view
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Bring the default view back. With `over`, only while that request
    /// is still the latest one.
    fn restore_default(&self, over: Option<u64>) {
        let Some(default_view) = self.default_view() else {
            tracing::debug!("No default view loaded yet, showing current set");
            self.show(&self.session.current());
            return;
        };

        let restored = match over {
            Some(sequence) => self.session.restore_over(sequence, &default_view),
            None => self.session.restore(&default_view),
        };
        if let Some(restored) = restored {
            tracing::info!("↩️ Restoring default view with {} stores", restored.len());
            self.show(&restored);
        }
    }
}

/// The store locator screen minus rendering: keeps the current store set,
/// the default (full listing) view, the catalog selection and the map
/// surface in step. Presentation code talks to it through the separate
/// event-sink handles rather than the locator itself.
pub struct StoreLocator<S: StoreSource, M: MapSurface> {
    shared: Arc<Shared<S, M>>,
}

impl<S: StoreSource, M: MapSurface> StoreLocator<S, M> {
    pub fn new(directory: DirectoryService<S>, map: M) -> Self {
        Self {
            shared: Arc::new(Shared {
                session: DirectorySession::new(directory),
                catalog: CatalogSelection::new(),
                surface: Mutex::new(Surface { map, shown: 0 }),
                default_view: RwLock::new(None),
            }),
        }
    }

    /// Load the full listing and remember it as the default view. It is
    /// shown unless a search was issued while it loaded.
    pub async fn start(&self) -> Result<RequestOutcome> {
        let (listing, outcome) = self.shared.session.refresh_listing().await?;
        tracing::info!("🗺️ Loaded {} stores", listing.len());
        *self
            .shared
            .default_view
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(listing);

        match &outcome {
            RequestOutcome::Applied(view) => self.shared.show(view),
            RequestOutcome::Superseded => {
                tracing::debug!("Listing kept as default view, a search is already showing")
            }
        }
        Ok(outcome)
    }

    pub fn current(&self) -> DirectoryView {
        self.shared.session.current()
    }

    pub fn default_view(&self) -> Option<DirectoryView> {
        self.shared.default_view()
    }

    pub fn catalog(&self) -> &CatalogSelection {
        &self.shared.catalog
    }

    pub fn map_events(&self) -> MapEvents<S, M> {
        MapEvents {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn search_events(&self) -> SearchEvents<S, M> {
        SearchEvents {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn with_map<R>(&self, f: impl FnOnce(&M) -> R) -> R {
        f(&self
            .shared
            .surface
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .map)
    }
}

pub struct MapEvents<S: StoreSource, M: MapSurface> {
    shared: Arc<Shared<S, M>>,
}

impl<S: StoreSource, M: MapSurface> MapEventSink for MapEvents<S, M> {
    fn pin_selected(&self, title: &str) {
        let view = self.shared.session.current();
        let count = self.shared.catalog.select(title, &view);
        tracing::debug!("Pin '{}' selected, {} products", title, count);
    }
}

pub struct SearchEvents<S: StoreSource, M: MapSurface> {
    shared: Arc<Shared<S, M>>,
}

#[async_trait]
impl<S: StoreSource, M: MapSurface> SearchEventSink for SearchEvents<S, M> {
    /// A search with no match brings the default view back; a failed one
    /// leaves the map as it was.
    async fn search_submitted(&self, text: &str) -> Result<()> {
        match self.shared.session.search(text).await? {
            RequestOutcome::Superseded => {
                tracing::debug!("Search '{}' superseded, map left as is", text)
            }
            RequestOutcome::Applied(view) if view.is_empty() => {
                self.shared.restore_default(Some(view.sequence))
            }
            RequestOutcome::Applied(view) => self.shared.show(&view),
        }
        Ok(())
    }

    fn search_cancelled(&self) {
        self.shared.restore_default(None);
    }
}
