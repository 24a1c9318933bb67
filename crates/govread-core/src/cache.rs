//! Per-session caches shared by concurrently decoded branches

use crate::error::Result;
use crate::types::ChainName;
use alloy_primitives::Address;
use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::sync::OnceCell;
use tracing::info;

/// Lazily populated batch-wrapper address per chain
///
/// The first caller for a chain performs the lookup; concurrent callers for the
/// same chain await the same cell. A failed lookup leaves the cell empty so a
/// later branch may try again.
#[derive(Debug, Default)]
pub struct MultisendCache {
    cells: Mutex<HashMap<ChainName, Arc<OnceCell<Option<Address>>>>>,
}

impl MultisendCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self, chain: &str) -> Arc<OnceCell<Option<Address>>> {
        let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells.entry(chain.to_string()).or_default().clone()
    }

    /// Cached address for `chain`, resolving it with `lookup` on first use
    pub async fn get_or_resolve<F, Fut>(&self, chain: &str, lookup: F) -> Result<Option<Address>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<Address>>>,
    {
        let cell = self.cell(chain);
        cell.get_or_try_init(lookup).await.copied()
    }

    /// Address already resolved for `chain`, without triggering a lookup
    pub fn cached(&self, chain: &str) -> Option<Option<Address>> {
        let cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells.get(chain).and_then(|cell| cell.get().copied())
    }
}

/// Chains whose security-module config is currently being derived
///
/// Only used for progress reporting.
#[derive(Debug, Default)]
pub struct DerivationTracker {
    in_progress: Mutex<BTreeSet<ChainName>>,
}

impl DerivationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `chain` as in progress until the returned guard is dropped
    pub fn start(&self, chain: &str) -> DerivationGuard<'_> {
        info!(chain, "Deriving ISM config...");
        self.in_progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(chain.to_string());
        DerivationGuard {
            tracker: self,
            chain: chain.to_string(),
            started: Instant::now(),
        }
    }

    pub fn in_progress(&self) -> Vec<ChainName> {
        self.in_progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

/// Removes its chain from the tracker on drop
pub struct DerivationGuard<'a> {
    tracker: &'a DerivationTracker,
    chain: ChainName,
    started: Instant,
}

impl Drop for DerivationGuard<'_> {
    fn drop(&mut self) {
        let remaining = {
            let mut in_progress = self
                .tracker
                .in_progress
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            in_progress.remove(&self.chain);
            in_progress.iter().cloned().collect::<Vec<_>>()
        };
        info!(
            chain = %self.chain,
            minutes = self.started.elapsed().as_secs_f64() / 60.0,
            "Finished deriving ISM config"
        );
        info!(
            count = remaining.len(),
            chains = ?remaining,
            "Remaining derivations in progress"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GovernError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_lookup_runs_once_per_chain() {
        let cache = MultisendCache::new();
        let calls = AtomicUsize::new(0);
        let address = Address::repeat_byte(0x42);

        for _ in 0..3 {
            let resolved = cache
                .get_or_resolve("ethereum", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Some(address))
                })
                .await
                .unwrap();
            assert_eq!(resolved, Some(address));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.cached("ethereum"), Some(Some(address)));
        assert_eq!(cache.cached("polygon"), None);
    }

    #[tokio::test]
    async fn test_failed_lookup_is_not_cached() {
        let cache = MultisendCache::new();
        let failed = cache
            .get_or_resolve("ethereum", || async { Err(GovernError::external("safe service down")) })
            .await;
        assert!(failed.is_err());
        assert_eq!(cache.cached("ethereum"), None);

        let resolved = cache
            .get_or_resolve("ethereum", || async { Ok(None) })
            .await
            .unwrap();
        assert_eq!(resolved, None);
        assert_eq!(cache.cached("ethereum"), Some(None));
    }

    #[test]
    fn test_tracker_guard_removes_chain() {
        let tracker = DerivationTracker::new();
        let first = tracker.start("ethereum");
        let second = tracker.start("polygon");
        assert_eq!(tracker.in_progress(), vec!["ethereum".to_string(), "polygon".to_string()]);
        drop(first);
        assert_eq!(tracker.in_progress(), vec!["polygon".to_string()]);
        drop(second);
        assert!(tracker.in_progress().is_empty());
    }
}
