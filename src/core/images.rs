use crate::core::{ImageFetcher, Product};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Fills one image slot per product. A slot whose fetch fails stays `None`;
/// failures are logged and never returned to the caller.
pub struct ImageLoader<F: ImageFetcher + 'static> {
    fetcher: Arc<F>,
    semaphore: Arc<Semaphore>,
}

impl<F: ImageFetcher + 'static> ImageLoader<F> {
    pub fn new(fetcher: F, concurrent_fetches: usize) -> Self {
        Self::with_arc_fetcher(Arc::new(fetcher), concurrent_fetches)
    }

    pub fn with_arc_fetcher(fetcher: Arc<F>, concurrent_fetches: usize) -> Self {
        Self {
            fetcher,
            semaphore: Arc::new(Semaphore::new(concurrent_fetches.max(1))),
        }
    }

    pub async fn load_one(&self, image_ref: &str) -> Option<Vec<u8>> {
        if image_ref.trim().is_empty() {
            return None;
        }

        let _permit = self.semaphore.acquire().await.ok();
        match self.fetcher.fetch(image_ref).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!("🖼️ Leaving image slot empty: {}", e);
                None
            }
        }
    }

    /// Slots come back in catalog order, whatever order the fetches finish in.
    pub async fn load(&self, products: &[Product]) -> Vec<Option<Vec<u8>>> {
        let mut slots = vec![None; products.len()];
        let mut join_set = JoinSet::new();

        for (index, product) in products.iter().enumerate() {
            let image_ref = product.image_ref().to_string();
            if image_ref.trim().is_empty() {
                tracing::debug!("Product '{}' has no image", product.name());
                continue;
            }

            let fetcher = Arc::clone(&self.fetcher);
            let semaphore = Arc::clone(&self.semaphore);
            join_set.spawn(async move {
                let _permit = semaphore.acquire().await.ok();
                (index, fetcher.fetch(&image_ref).await)
            });
        }

        let mut fetched = 0;
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, Ok(bytes))) => {
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = Some(bytes);
                        fetched += 1;
                    }
                }
                Ok((_, Err(e))) => tracing::warn!("🖼️ Leaving image slot empty: {}", e),
                Err(e) => tracing::warn!("🖼️ Image fetch task aborted: {}", e),
            }
        }

        tracing::debug!("Fetched {}/{} product images", fetched, products.len());
        slots
    }
}
