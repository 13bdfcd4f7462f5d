use crate::domain::model::Store;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Which directory call produced a result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Provenance {
    ListAll,
    Search(String),
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListAll => write!(f, "listAll"),
            Self::Search(term) => write!(f, "search:{}", term),
        }
    }
}

/// The store set currently on display, plus where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryView {
    pub stores: Vec<Store>,
    pub provenance: Provenance,
    pub sequence: u64,
    pub loaded_at: DateTime<Utc>,
}

impl DirectoryView {
    pub fn new(stores: Vec<Store>, provenance: Provenance, sequence: u64) -> Self {
        Self {
            stores,
            provenance,
            sequence,
            loaded_at: Utc::now(),
        }
    }

    /// The view a session starts with, before any directory call lands.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Provenance::ListAll, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Store> {
        find_by_name(name, &self.stores)
    }

    /// Names occurring more than once, in first-seen order.
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();

        for store in &self.stores {
            if !seen.insert(store.name()) && reported.insert(store.name()) {
                duplicates.push(store.name());
            }
        }

        duplicates
    }
}

/// First store whose name equals `name` exactly. Later duplicates are shadowed.
pub fn find_by_name<'a>(name: &str, within: &'a [Store]) -> Option<&'a Store> {
    within.iter().find(|store| store.name() == name)
}
