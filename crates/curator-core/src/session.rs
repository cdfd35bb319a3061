use crate::aggregator::{scan, ScanResult};
use crate::cache::ScanCache;
use crate::corpus::CorpusSource;
use crate::error::ScanError;
use std::sync::Arc;

/// Owns a corpus and the snapshot of its last scan.
///
/// Views read the snapshot instead of rescanning; a batch action that
/// changes the vault calls [`Curator::invalidate`] so the next read scans.
pub struct Curator<C> {
    corpus: C,
    cache: ScanCache,
}

impl<C: CorpusSource> Curator<C> {
    pub fn new(corpus: C) -> Self {
        Self {
            corpus,
            cache: ScanCache::new(),
        }
    }

    pub fn corpus(&self) -> &C {
        &self.corpus
    }

    /// Scan now and replace the snapshot. A failed scan leaves the old one.
    pub async fn refresh(&self) -> Result<Arc<ScanResult>, ScanError> {
        let result = Arc::new(scan(&self.corpus).await?);
        self.cache.set(result.clone());
        Ok(result)
    }

    /// The cached snapshot, scanning first if there is none.
    pub async fn snapshot(&self) -> Result<Arc<ScanResult>, ScanError> {
        match self.cache.get() {
            Some(cached) => {
                tracing::debug!("Using cached scan with {} links", cached.len());
                Ok(cached)
            }
            None => self.refresh().await,
        }
    }

    pub fn cached(&self) -> Option<Arc<ScanResult>> {
        self.cache.get()
    }

    pub fn invalidate(&self) {
        tracing::debug!("Scan cache cleared");
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::corpus::MemoryCorpus;
    use crate::link::LinkReference;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Counts enumerations so tests can tell a cache hit from a rescan.
    struct CountingCorpus {
        inner: MemoryCorpus,
        scans: AtomicUsize,
        fail: AtomicBool,
    }

    impl CountingCorpus {
        fn new(fail: bool) -> Self {
            Self {
                inner: MemoryCorpus::new()
                    .with_document("Notes/A.md", vec![LinkReference::new("Topic X")]),
                scans: AtomicUsize::new(0),
                fail: AtomicBool::new(fail),
            }
        }
    }

    #[async_trait]
    impl CorpusSource for CountingCorpus {
        type Document = usize;

        async fn enumerate_documents(&self) -> anyhow::Result<Vec<usize>> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                anyhow::bail!("vault unavailable");
            }
            self.inner.enumerate_documents().await
        }

        async fn link_references(&self, doc: &usize) -> anyhow::Result<Vec<LinkReference>> {
            self.inner.link_references(doc).await
        }

        fn resolves(&self, reference: &LinkReference, from: &usize) -> anyhow::Result<bool> {
            self.inner.resolves(reference, from)
        }

        fn path(&self, doc: &usize) -> anyhow::Result<String> {
            self.inner.path(doc)
        }
    }

    #[tokio::test]
    async fn snapshot_scans_once_then_reuses_cache() {
        let curator = Curator::new(CountingCorpus::new(false));
        assert!(curator.cached().is_none());

        let first = curator.snapshot().await.unwrap();
        let second = curator.snapshot().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(curator.corpus().scans.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_next_snapshot_to_scan() {
        let curator = Curator::new(CountingCorpus::new(false));
        curator.snapshot().await.unwrap();
        curator.invalidate();
        assert!(curator.cached().is_none());
        curator.snapshot().await.unwrap();
        assert_eq!(curator.corpus().scans.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn refresh_always_scans() {
        let curator = Curator::new(CountingCorpus::new(false));
        curator.refresh().await.unwrap();
        curator.refresh().await.unwrap();
        assert_eq!(curator.corpus().scans.load(Ordering::SeqCst), 2);
        assert_eq!(curator.cached().unwrap().entries[0].link_text, "Topic X");
    }

    #[tokio::test]
    async fn failed_scan_does_not_populate_cache() {
        let curator = Curator::new(CountingCorpus::new(true));
        let err = curator.snapshot().await.unwrap_err();
        assert!(matches!(err, ScanError::Enumerate(_)));
        assert!(curator.cached().is_none());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let curator = Curator::new(CountingCorpus::new(false));
        let good = curator.refresh().await.unwrap();

        curator.corpus().fail.store(true, Ordering::SeqCst);
        assert!(curator.refresh().await.is_err());

        let cached = curator.cached().expect("previous snapshot survives");
        assert!(Arc::ptr_eq(&cached, &good));
        let again = curator.snapshot().await.unwrap();
        assert!(Arc::ptr_eq(&again, &good), "snapshot serves the cache, no rescan");
        assert_eq!(curator.corpus().scans.load(Ordering::SeqCst), 2);
    }
}
