use crate::core::{DirectoryService, DirectoryView, Provenance, Result, Store, StoreSource};
use std::future::Future;
use std::sync::{PoisonError, RwLock};
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub enum RequestOutcome {
    /// The request was the latest one and its stores are now current.
    Applied(DirectoryView),
    /// A newer request was issued first; the result (if any) was dropped.
    Superseded,
}

impl RequestOutcome {
    pub fn applied(&self) -> Option<&DirectoryView> {
        match self {
            Self::Applied(view) => Some(view),
            Self::Superseded => None,
        }
    }
}

/// Owns the current store set on behalf of a single consumer.
///
/// Every request takes the next sequence number. Issuing a request cancels
/// whichever one is still waiting on the source, and a completion only
/// becomes current if no newer request was issued in the meantime, so the
/// last request issued always wins regardless of completion order. A failed
/// request leaves the current view as it was.
pub struct DirectorySession<S: StoreSource> {
    directory: DirectoryService<S>,
    issued: watch::Sender<u64>,
    current: RwLock<DirectoryView>,
}

impl<S: StoreSource> DirectorySession<S> {
    pub fn new(directory: DirectoryService<S>) -> Self {
        let (issued, _) = watch::channel(0);
        Self {
            directory,
            issued,
            current: RwLock::new(DirectoryView::empty()),
        }
    }

    pub fn directory(&self) -> &DirectoryService<S> {
        &self.directory
    }

    pub fn current(&self) -> DirectoryView {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn latest_issued(&self) -> u64 {
        *self.issued.borrow()
    }

    pub async fn refresh(&self) -> Result<RequestOutcome> {
        self.run(Provenance::ListAll, self.directory.list_all()).await
    }

    pub async fn search(&self, query: &str) -> Result<RequestOutcome> {
        self.run(
            Provenance::Search(query.trim().to_string()),
            self.directory.search(query),
        )
        .await
    }

    /// Like `refresh`, but a newer request does not cancel the fetch. The
    /// listing is always returned alongside the outcome; it only becomes
    /// current if nothing newer was issued while it loaded.
    pub async fn refresh_listing(&self) -> Result<(DirectoryView, RequestOutcome)> {
        let (sequence, _) = self.issue();
        tracing::debug!("Listing request #{} issued", sequence);

        let stores = self.directory.list_all().await.map_err(|e| {
            tracing::warn!("⚠️ Listing request #{} failed: {}", sequence, e);
            e
        })?;

        let listing = DirectoryView::new(stores.clone(), Provenance::ListAll, sequence);
        Ok((listing, self.apply(sequence, Provenance::ListAll, stores)))
    }

    /// Make `view` current, cancelling anything in flight. Returns `None`
    /// only if a request issued concurrently got applied first.
    pub fn restore(&self, view: &DirectoryView) -> Option<DirectoryView> {
        let (sequence, _) = self.issue();
        self.replace(sequence, view)
    }

    /// Make `view` current only if `sequence` is still the latest request.
    /// Returns `None` when something newer was issued in the meantime.
    pub fn restore_over(&self, sequence: u64, view: &DirectoryView) -> Option<DirectoryView> {
        let mut next = 0;
        let issued = self.issued.send_if_modified(|latest| {
            if *latest != sequence {
                return false;
            }
            *latest += 1;
            next = *latest;
            true
        });

        if !issued {
            tracing::debug!("Not restoring over #{}, a newer request exists", sequence);
            return None;
        }
        self.replace(next, view)
    }

    fn replace(&self, sequence: u64, view: &DirectoryView) -> Option<DirectoryView> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if self.latest_issued() != sequence {
            tracing::debug!("Restore #{} overtaken before it applied", sequence);
            return None;
        }

        let mut restored = view.clone();
        restored.sequence = sequence;
        *current = restored.clone();
        tracing::debug!("Restored {} view as #{}", restored.provenance, sequence);
        Some(restored)
    }

    fn issue(&self) -> (u64, watch::Receiver<u64>) {
        let mut sequence = 0;
        self.issued.send_modify(|latest| {
            *latest += 1;
            sequence = *latest;
        });
        (sequence, self.issued.subscribe())
    }

    async fn run<F>(&self, provenance: Provenance, fetch: F) -> Result<RequestOutcome>
    where
        F: Future<Output = Result<Vec<Store>>>,
    {
        let (sequence, updates) = self.issue();
        tracing::debug!("Request #{} ({}) issued", sequence, provenance);

        let result = tokio::select! {
            result = fetch => result,
            _ = superseded(updates, sequence) => {
                tracing::debug!("Request #{} ({}) cancelled by a newer one", sequence, provenance);
                return Ok(RequestOutcome::Superseded);
            }
        };

        match result {
            Ok(stores) => Ok(self.apply(sequence, provenance, stores)),
            Err(e) if self.latest_issued() != sequence => {
                tracing::debug!("Request #{} failed after being superseded: {}", sequence, e);
                Ok(RequestOutcome::Superseded)
            }
            Err(e) => {
                tracing::warn!(
                    "⚠️ Request #{} ({}) failed, keeping previous view: {}",
                    sequence,
                    provenance,
                    e
                );
                Err(e)
            }
        }
    }

    fn apply(&self, sequence: u64, provenance: Provenance, stores: Vec<Store>) -> RequestOutcome {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);

        if self.latest_issued() != sequence {
            tracing::debug!("Discarding stale completion #{} ({})", sequence, provenance);
            return RequestOutcome::Superseded;
        }

        let view = DirectoryView::new(stores, provenance, sequence);
        let duplicates = view.duplicate_names();
        if !duplicates.is_empty() {
            tracing::warn!(
                "Result set {} has duplicate store names {:?}; lookups use the first match",
                view.provenance,
                duplicates
            );
        }

        tracing::debug!(
            "Request #{} ({}) applied with {} stores",
            sequence,
            view.provenance,
            view.len()
        );
        *current = view.clone();
        RequestOutcome::Applied(view)
    }
}

async fn superseded(mut updates: watch::Receiver<u64>, sequence: u64) {
    let newer = updates.wait_for(|latest| *latest > sequence).await.map(|_| ());
    if newer.is_err() {
        // sender gone: nothing can supersede us any more
        std::future::pending::<()>().await;
    }
}
