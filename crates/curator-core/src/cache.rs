use crate::aggregator::ScanResult;
use arc_swap::ArcSwapOption;
use std::sync::Arc;

/// Holds the last successful scan so views can render without rescanning.
///
/// Writes swap the whole snapshot atomically; readers get an `Arc` that stays
/// valid after a later `set` or `clear`. Two scans finishing concurrently race
/// and the last `set` wins.
#[derive(Debug, Default)]
pub struct ScanCache {
    current: ArcSwapOption<ScanResult>,
}

impl ScanCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<ScanResult>> {
        self.current.load_full()
    }

    pub fn set(&self, result: Arc<ScanResult>) {
        self.current.store(Some(result));
    }

    /// Forget the snapshot, forcing the next read to scan.
    pub fn clear(&self) {
        self.current.store(None);
    }

    pub fn is_empty(&self) -> bool {
        self.current.load().is_none()
    }
}
