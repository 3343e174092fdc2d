//! Process-local storage for generated study guides.
//!
//! Guides live only as long as the process. Identifiers are sequential, start at 1, and are never
//! reused.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::processing::StudyGuide;

/// In-memory map from guide identifier to the immutable guide.
pub struct GuideStore {
    next_id: AtomicU64,
    guides: RwLock<HashMap<u64, StudyGuide>>,
}

impl Default for GuideStore {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            guides: RwLock::new(HashMap::new()),
        }
    }
}

impl GuideStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next identifier.
    pub fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Store a guide under its own identifier, returning a copy for the caller.
    pub async fn insert(&self, guide: StudyGuide) -> StudyGuide {
        let mut guides = self.guides.write().await;
        guides.insert(guide.id, guide.clone());
        tracing::debug!(id = guide.id, stored = guides.len(), "Stored study guide");
        guide
    }

    /// Look up a guide by identifier.
    pub async fn get(&self, id: u64) -> Option<StudyGuide> {
        self.guides.read().await.get(&id).cloned()
    }
}
