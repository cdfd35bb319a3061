use anyhow::Context;
use arc_swap::ArcSwap;
use async_trait::async_trait;
use curator_core::link_parser::extract_link_references;
use curator_core::vault_index::VaultIndex;
use curator_core::{CorpusSource, LinkReference};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::{DirEntry, WalkDir};

/// A markdown note inside the vault.
///
/// Carries the index of the listing it came from, so every link in one scan
/// resolves against the same snapshot even if another scan lists the vault
/// meanwhile.
#[derive(Clone)]
pub struct VaultDocument {
    /// Vault-relative, `/`-separated path
    pub path: String,
    index: Arc<VaultIndex>,
}

/// Corpus backed by a directory of markdown files.
///
/// Every enumeration walks the directory again and publishes a fresh link
/// resolution index, so a scan always sees the current vault.
pub struct FsCorpus {
    root: PathBuf,
    exclude: Vec<String>,
    index: ArcSwap<VaultIndex>,
}

impl FsCorpus {
    pub fn new(root: impl Into<PathBuf>, exclude: Vec<String>) -> Self {
        Self {
            root: root.into(),
            exclude: exclude
                .into_iter()
                .map(|e| e.trim_matches('/').to_string())
                .filter(|e| !e.is_empty())
                .collect(),
            index: ArcSwap::from_pointee(VaultIndex::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Convert a path relative to the vault root into `a/b/c.md` form.
fn to_vault_path(relative: &Path) -> String {
    relative
        .iter()
        .map(|c| c.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_markdown(path: &str) -> bool {
    path.to_lowercase().ends_with(".md")
}

/// Hidden entries (`.obsidian`, `.trash`, `.git`) and configured excludes are skipped.
fn is_skipped(entry: &DirEntry, root: &Path, exclude: &[String]) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    if entry.file_name().to_string_lossy().starts_with('.') {
        return true;
    }
    let Ok(relative) = entry.path().strip_prefix(root) else {
        return false;
    };
    let relative = to_vault_path(relative);
    exclude
        .iter()
        .any(|e| relative == *e || relative.starts_with(&format!("{}/", e)))
}

/// All file paths in the vault, in walk order (entries sorted by name).
fn walk_vault(root: &Path, exclude: &[String]) -> anyhow::Result<Vec<String>> {
    if !root.is_dir() {
        anyhow::bail!("vault root {} is not a directory", root.display());
    }

    let mut paths = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped(e, root, exclude));
    for entry in walker {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .with_context(|| format!("{} is outside the vault", entry.path().display()))?;
        paths.push(to_vault_path(relative));
    }
    Ok(paths)
}

#[async_trait]
impl CorpusSource for FsCorpus {
    type Document = VaultDocument;

    async fn enumerate_documents(&self) -> anyhow::Result<Vec<VaultDocument>> {
        let root = self.root.clone();
        let exclude = self.exclude.clone();
        let files = tokio::task::spawn_blocking(move || walk_vault(&root, &exclude))
            .await
            .context("vault walk task failed")??;

        let index = Arc::new(VaultIndex::from_paths(files.iter().cloned()));
        self.index.store(index.clone());
        let documents: Vec<VaultDocument> = files
            .into_iter()
            .filter(|p| is_markdown(p))
            .map(|path| VaultDocument {
                path,
                index: index.clone(),
            })
            .collect();
        tracing::info!(
            "Vault {}: {} files, {} markdown documents",
            self.root.display(),
            index.len(),
            documents.len()
        );
        Ok(documents)
    }

    async fn link_references(&self, doc: &VaultDocument) -> anyhow::Result<Vec<LinkReference>> {
        let content = tokio::fs::read_to_string(self.root.join(&doc.path))
            .await
            .with_context(|| format!("failed to read {}", doc.path))?;
        Ok(extract_link_references(&content))
    }

    fn resolves(&self, reference: &LinkReference, from: &VaultDocument) -> anyhow::Result<bool> {
        Ok(from.index.resolves(&reference.raw_target, &from.path))
    }

    fn path(&self, doc: &VaultDocument) -> anyhow::Result<String> {
        Ok(doc.path.clone())
    }
}
