use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use store_locator::core::{CatalogDataSource, StoreSource};
use store_locator::domain::ports::{MapEventSink, MapSurface, Pin, SearchEventSink};
use store_locator::{
    Coordinates, DirectoryService, ImageLoader, InMemoryStoreSource, LocatorError, Product,
    Provenance, RequestOutcome, Store, StoreLocator,
};

#[derive(Default)]
struct RecordingMap {
    frames: Vec<Vec<Pin>>,
}

impl RecordingMap {
    fn last_titles(&self) -> Vec<String> {
        self.frames
            .last()
            .map(|pins| pins.iter().map(|pin| pin.title.clone()).collect())
            .unwrap_or_default()
    }
}

impl MapSurface for RecordingMap {
    fn show_pins(&mut self, pins: &[Pin]) {
        self.frames.push(pins.to_vec());
    }
}

fn seeded_stores() -> Vec<Store> {
    vec![
        Store::new(
            "Acme",
            Coordinates::new(48.85, 2.35).unwrap(),
            vec![
                Product::new("Widget A", "img/a.png").unwrap(),
                Product::new("Widget B", "img/b.png").unwrap(),
            ],
        )
        .unwrap(),
        Store::new(
            "Acme Outlet",
            Coordinates::new(48.9, 2.4).unwrap(),
            vec![Product::new("Seconds", "img/s.png").unwrap()],
        )
        .unwrap(),
        Store::new("Zenith", Coordinates::new(-33.87, 151.21).unwrap(), vec![]).unwrap(),
    ]
}

/// In-memory directory that can be switched off to simulate an outage.
struct SwitchableSource {
    inner: InMemoryStoreSource,
    down: Arc<AtomicBool>,
}

#[async_trait]
impl StoreSource for SwitchableSource {
    async fn list_all(&self) -> store_locator::Result<Vec<Store>> {
        if self.down.load(Ordering::SeqCst) {
            return Err(LocatorError::unavailable("directory offline"));
        }
        self.inner.list_all().await
    }

    async fn search(&self, query: &str) -> store_locator::Result<Vec<Store>> {
        if self.down.load(Ordering::SeqCst) {
            return Err(LocatorError::unavailable("directory offline"));
        }
        self.inner.search(query).await
    }
}

/// Seeded directory with latency: the listing takes `listing_delay`, a
/// search takes 40ms per query character.
struct SlowSource {
    inner: InMemoryStoreSource,
    listing_delay: Duration,
}

#[async_trait]
impl StoreSource for SlowSource {
    async fn list_all(&self) -> store_locator::Result<Vec<Store>> {
        tokio::time::sleep(self.listing_delay).await;
        self.inner.list_all().await
    }

    async fn search(&self, query: &str) -> store_locator::Result<Vec<Store>> {
        tokio::time::sleep(Duration::from_millis(query.len() as u64 * 40)).await;
        self.inner.search(query).await
    }
}

fn slow_locator(listing_delay: Duration) -> StoreLocator<SlowSource, RecordingMap> {
    let source = SlowSource {
        inner: InMemoryStoreSource::new(seeded_stores()),
        listing_delay,
    };
    StoreLocator::new(DirectoryService::new(source), RecordingMap::default())
}

fn locator() -> (StoreLocator<SwitchableSource, RecordingMap>, Arc<AtomicBool>) {
    let down = Arc::new(AtomicBool::new(false));
    let source = SwitchableSource {
        inner: InMemoryStoreSource::new(seeded_stores()),
        down: Arc::clone(&down),
    };
    (
        StoreLocator::new(DirectoryService::new(source), RecordingMap::default()),
        down,
    )
}

#[tokio::test]
async fn test_start_shows_every_store() {
    let (locator, _) = locator();
    locator.start().await.unwrap();

    let titles = locator.with_map(RecordingMap::last_titles);
    assert_eq!(titles, vec!["Acme", "Acme Outlet", "Zenith"]);

    let pin = locator.with_map(|map| map.frames[0][2].clone());
    assert_eq!(pin.coordinates.latitude(), -33.87);
    assert_eq!(locator.default_view().unwrap().len(), 3);
}

#[tokio::test]
async fn test_search_then_select_pin() {
    let (locator, _) = locator();
    locator.start().await.unwrap();

    locator.search_events().search_submitted("outlet").await.unwrap();
    assert_eq!(locator.with_map(RecordingMap::last_titles), vec!["Acme Outlet"]);
    assert_eq!(
        locator.current().provenance,
        Provenance::Search("outlet".to_string())
    );

    locator.map_events().pin_selected("Acme Outlet");
    let catalog = locator.catalog();
    assert_eq!(catalog.selected_store().as_deref(), Some("Acme Outlet"));
    assert_eq!(catalog.row_count(), 1);
    assert_eq!(catalog.product_at(0).unwrap().name(), "Seconds");
}

#[tokio::test]
async fn test_selection_resolves_against_displayed_set() {
    let (locator, _) = locator();
    locator.start().await.unwrap();
    locator.search_events().search_submitted("outlet").await.unwrap();

    // "Acme" is no longer on the map, so its catalog is not available
    locator.map_events().pin_selected("Acme");
    assert_eq!(locator.catalog().row_count(), 0);
    assert!(locator.catalog().selected_store().is_none());
}

#[tokio::test]
async fn test_search_without_match_restores_default_view() {
    let (locator, _) = locator();
    locator.start().await.unwrap();

    locator.search_events().search_submitted("nope").await.unwrap();

    assert_eq!(
        locator.with_map(RecordingMap::last_titles),
        vec!["Acme", "Acme Outlet", "Zenith"]
    );
    assert_eq!(locator.current().provenance, Provenance::ListAll);

    locator.map_events().pin_selected("Acme");
    assert_eq!(locator.catalog().row_count(), 2);
}

#[tokio::test]
async fn test_cancel_restores_default_view() {
    let (locator, _) = locator();
    locator.start().await.unwrap();
    locator.search_events().search_submitted("zen").await.unwrap();
    assert_eq!(locator.with_map(RecordingMap::last_titles), vec!["Zenith"]);

    locator.search_events().search_cancelled();
    assert_eq!(locator.with_map(RecordingMap::last_titles).len(), 3);
    assert_eq!(locator.current().len(), 3);
}

#[tokio::test]
async fn test_failed_search_leaves_map_untouched() {
    let (locator, down) = locator();
    locator.start().await.unwrap();
    locator.search_events().search_submitted("zen").await.unwrap();
    let frames_before = locator.with_map(|map| map.frames.len());

    down.store(true, Ordering::SeqCst);
    let result = locator.search_events().search_submitted("acme").await;

    assert!(matches!(result, Err(LocatorError::ServiceUnavailable { .. })));
    assert_eq!(locator.with_map(|map| map.frames.len()), frames_before);
    assert_eq!(locator.with_map(RecordingMap::last_titles), vec!["Zenith"]);
    assert_eq!(locator.current().len(), 1);
}

#[tokio::test]
async fn test_failed_start_shows_nothing() {
    let (locator, down) = locator();
    down.store(true, Ordering::SeqCst);

    assert!(locator.start().await.is_err());
    assert!(locator.with_map(|map| map.frames.is_empty()));
    assert!(locator.default_view().is_none());
    assert!(locator.current().is_empty());
}

#[tokio::test]
async fn test_search_during_start_keeps_default_view() {
    let locator = slow_locator(Duration::from_millis(200));

    let (started, searched) = tokio::join!(locator.start(), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        locator.search_events().search_submitted("zen").await
    });

    assert!(matches!(started.unwrap(), RequestOutcome::Superseded));
    searched.unwrap();
    assert_eq!(locator.with_map(RecordingMap::last_titles), vec!["Zenith"]);
    assert_eq!(locator.default_view().unwrap().len(), 3);

    locator.search_events().search_submitted("nope").await.unwrap();
    assert_eq!(
        locator.with_map(RecordingMap::last_titles),
        vec!["Acme", "Acme Outlet", "Zenith"]
    );

    locator.search_events().search_submitted("zen").await.unwrap();
    locator.search_events().search_cancelled();
    assert_eq!(locator.with_map(RecordingMap::last_titles).len(), 3);
    assert_eq!(locator.current().provenance, Provenance::ListAll);
}

#[tokio::test]
async fn test_superseded_search_leaves_map_alone() {
    let locator = slow_locator(Duration::ZERO);
    locator.start().await.unwrap();
    let search = locator.search_events();

    let (older, newer) = tokio::join!(search.search_submitted("outlet"), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        search.search_submitted("zen").await
    });

    assert!(older.is_ok());
    assert!(newer.is_ok());

    let frames = locator.with_map(|map| map.frames.len());
    assert_eq!(frames, 2);
    assert_eq!(locator.with_map(RecordingMap::last_titles), vec!["Zenith"]);
    assert_eq!(locator.current().provenance, Provenance::Search("zen".to_string()));
}

#[tokio::test]
async fn test_cancel_during_search_wins() {
    let locator = slow_locator(Duration::ZERO);
    locator.start().await.unwrap();
    let search = locator.search_events();

    let (searched, _) = tokio::join!(search.search_submitted("outlet"), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        search.search_cancelled();
    });
    assert!(searched.is_ok());

    // give the cancelled search time to have finished had it kept running
    tokio::time::sleep(Duration::from_millis(300)).await;

    let frames = locator.with_map(|map| map.frames.clone());
    assert_eq!(frames.len(), 2);
    assert_eq!(locator.with_map(RecordingMap::last_titles).len(), 3);
    assert_eq!(locator.current().provenance, Provenance::ListAll);

    locator.map_events().pin_selected("Acme Outlet");
    assert_eq!(locator.catalog().row_count(), 1);
}

#[tokio::test]
async fn test_selected_catalog_images_with_missing_entries() {
    struct PartialFetcher;

    #[async_trait]
    impl store_locator::core::ImageFetcher for PartialFetcher {
        async fn fetch(&self, image_ref: &str) -> store_locator::Result<Vec<u8>> {
            if image_ref == "img/b.png" {
                return Err(LocatorError::fetch_failed(image_ref, "status 404"));
            }
            Ok(vec![1, 2, 3])
        }
    }

    let (locator, _) = locator();
    locator.start().await.unwrap();
    locator.map_events().pin_selected("Acme");

    let loader = ImageLoader::new(PartialFetcher, 2);
    let slots = loader.load(&locator.catalog().products()).await;

    assert_eq!(slots, vec![Some(vec![1, 2, 3]), None]);
}
