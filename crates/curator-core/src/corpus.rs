use crate::link::LinkReference;
use async_trait::async_trait;
use std::collections::HashSet;

/// Supplies documents and their link metadata to the aggregator.
///
/// Implementations own parsing and link resolution; the aggregator only asks
/// which references fail to resolve. Any error aborts the whole scan.
#[async_trait]
pub trait CorpusSource: Send + Sync {
    type Document: Send + Sync;

    /// All documents, in a stable order. The order decides which document
    /// becomes an unresolved link's canonical source.
    async fn enumerate_documents(&self) -> anyhow::Result<Vec<Self::Document>>;

    /// Outgoing references of one document, in document order.
    async fn link_references(&self, doc: &Self::Document) -> anyhow::Result<Vec<LinkReference>>;

    /// Whether `reference`, as written in `from`, points at an existing document.
    fn resolves(&self, reference: &LinkReference, from: &Self::Document) -> anyhow::Result<bool>;

    /// Vault-relative, `/`-separated path of a document.
    fn path(&self, doc: &Self::Document) -> anyhow::Result<String>;
}

/// A corpus held entirely in memory, for hosts that already have link metadata.
///
/// A reference resolves when its raw target (case-insensitive) is a document
/// path without the `.md` extension, or was registered with [`MemoryCorpus::with_existing`].
#[derive(Clone, Debug, Default)]
pub struct MemoryCorpus {
    documents: Vec<(String, Vec<LinkReference>)>,
    existing: HashSet<String>,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, path: &str, links: Vec<LinkReference>) -> Self {
        let name = path.strip_suffix(".md").unwrap_or(path).to_lowercase();
        self.existing.insert(name);
        self.documents.push((path.to_string(), links));
        self
    }

    pub fn with_existing(mut self, target: &str) -> Self {
        self.existing.insert(target.to_lowercase());
        self
    }
}

#[async_trait]
impl CorpusSource for MemoryCorpus {
    type Document = usize;

    async fn enumerate_documents(&self) -> anyhow::Result<Vec<usize>> {
        Ok((0..self.documents.len()).collect())
    }

    async fn link_references(&self, doc: &usize) -> anyhow::Result<Vec<LinkReference>> {
        self.documents
            .get(*doc)
            .map(|(_, links)| links.clone())
            .ok_or_else(|| anyhow::anyhow!("no document at index {}", doc))
    }

    fn resolves(&self, reference: &LinkReference, _from: &usize) -> anyhow::Result<bool> {
        Ok(self.existing.contains(&reference.raw_target.to_lowercase()))
    }

    fn path(&self, doc: &usize) -> anyhow::Result<String> {
        self.documents
            .get(*doc)
            .map(|(path, _)| path.clone())
            .ok_or_else(|| anyhow::anyhow!("no document at index {}", doc))
    }
}
