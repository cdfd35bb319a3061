use crate::corpus::CorpusSource;
use crate::error::ScanError;
use crate::link::{LinkReference, UnresolvedLinkInfo};
use serde::Serialize;
use std::collections::HashMap;

/// Counters collected during one scan.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub documents: usize,
    /// All references seen, resolved or not.
    pub references: usize,
    pub unresolved: usize,
    /// References with neither a label nor a target.
    pub malformed_skipped: usize,
}

/// Output of one aggregation pass.
///
/// `entries` are in first-insertion order. Sorting, filtering and grouping
/// borrow from it and never modify it.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ScanResult {
    pub entries: Vec<UnresolvedLinkInfo>,
    pub stats: ScanStats,
}

impl ScanResult {
    pub fn get(&self, link_text: &str) -> Option<&UnresolvedLinkInfo> {
        self.entries.iter().find(|e| e.link_text == link_text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds the unresolved-link registry one reference at a time.
///
/// Keyed by link text, in first-insertion order. Callers feed documents in a
/// stable order; the first document that records a link becomes its canonical
/// source.
#[derive(Debug, Default)]
pub struct LinkAggregator {
    index: HashMap<String, usize>,
    entries: Vec<UnresolvedLinkInfo>,
    stats: ScanStats,
}

impl LinkAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a document and the number of references it holds.
    pub fn observe_document(&mut self, reference_count: usize) {
        self.stats.documents += 1;
        self.stats.references += reference_count;
    }

    /// Record one unresolved reference found in `source_path`.
    ///
    /// Returns false when the reference carries no usable text and was skipped.
    pub fn record(&mut self, source_path: &str, reference: &LinkReference) -> bool {
        let Some(link_text) = reference.link_text() else {
            self.skip_malformed(source_path);
            return false;
        };

        self.stats.unresolved += 1;
        match self.index.get(link_text) {
            Some(&idx) => self.entries[idx].record(source_path),
            None => {
                self.index.insert(link_text.to_string(), self.entries.len());
                self.entries
                    .push(UnresolvedLinkInfo::first_seen(link_text, source_path));
            }
        }
        true
    }

    fn skip_malformed(&mut self, source_path: &str) {
        self.stats.malformed_skipped += 1;
        tracing::warn!("Skipping link without target or label in {}", source_path);
    }

    pub fn finish(self) -> ScanResult {
        ScanResult {
            entries: self.entries,
            stats: self.stats,
        }
    }
}

/// Walk the corpus once and aggregate every unresolved reference.
///
/// Documents are processed one at a time in enumeration order. The first
/// collaborator failure aborts the scan; malformed references are skipped.
pub async fn scan<C>(corpus: &C) -> Result<ScanResult, ScanError>
where
    C: CorpusSource + ?Sized,
{
    let documents = corpus
        .enumerate_documents()
        .await
        .map_err(ScanError::Enumerate)?;
    tracing::info!("Scanning {} documents for unresolved links", documents.len());

    let mut aggregator = LinkAggregator::new();

    for doc in &documents {
        let path = corpus.path(doc).map_err(ScanError::Path)?;
        let references = corpus
            .link_references(doc)
            .await
            .map_err(|source| ScanError::ReadLinks {
                path: path.clone(),
                source,
            })?;
        aggregator.observe_document(references.len());

        for reference in &references {
            if reference.link_text().is_none() {
                aggregator.skip_malformed(&path);
                continue;
            }
            let resolved = corpus
                .resolves(reference, doc)
                .map_err(|source| ScanError::Resolve {
                    path: path.clone(),
                    target: reference.raw_target.clone(),
                    source,
                })?;
            if !resolved {
                aggregator.record(&path, reference);
            }
        }
        tracing::debug!("Doc {}: {} references", path, references.len());
    }

    let result = aggregator.finish();
    tracing::info!(
        "Scan complete: {} documents, {} references, {} unresolved ({} distinct), {} malformed",
        result.stats.documents,
        result.stats.references,
        result.stats.unresolved,
        result.entries.len(),
        result.stats.malformed_skipped
    );
    Ok(result)
}
