use dashmap::DashMap;

/// Resolve `link` against the directory containing `current_file_path`.
///
/// Both are `/`-separated; `.` and `..` segments are applied, and `..` never
/// climbs above the vault root. The result has no leading `/`.
///
/// Example: `resolve_relative("Notes/Source.md", "../Ideas")` → `"Ideas"`
pub fn resolve_relative(current_file_path: &str, link: &str) -> String {
    let dir = &current_file_path[..current_file_path.rfind('/').unwrap_or(0)];
    join_segments(dir, link)
}

fn join_segments(base_dir: &str, link: &str) -> String {
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for part in link.split('/') {
        if part == ".." {
            segments.pop();
        } else if part != "." && !part.is_empty() {
            segments.push(part);
        }
    }
    segments.join("/")
}

/// Last path segment, lowercased.
fn basename_key(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_lowercase()
}

/// Paths to try for a link: as written, then with `.md` appended.
fn with_extensions(path: &str) -> Vec<String> {
    let mut candidates = vec![path.to_string()];
    if !path.to_lowercase().ends_with(".md") {
        candidates.push(format!("{}.md", path));
    }
    candidates
}

/// Case-insensitive index of every file path in a vault, used to decide
/// whether a link points at something that exists.
///
/// Paths are vault-relative and `/`-separated (`Notes/Topic.md`). An index is
/// built once from a full listing and not changed afterwards; a rescan builds
/// a new one, so readers never see a partly filled index.
pub struct VaultIndex {
    /// Lowercased path -> path as stored
    paths: DashMap<String, String>,
    /// Lowercased basename -> stored paths sharing it
    by_name: DashMap<String, Vec<String>>,
}

impl Default for VaultIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultIndex {
    pub fn new() -> Self {
        Self {
            paths: DashMap::new(),
            by_name: DashMap::new(),
        }
    }

    /// Build an index holding exactly `paths`.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = Self::new();
        for path in paths {
            index.insert(path);
        }
        tracing::debug!("Vault index built with {} paths", index.paths.len());
        index
    }

    fn insert(&self, path: impl Into<String>) {
        let path: String = path.into();
        let path = path.trim_start_matches('/').to_string();
        if self.paths.insert(path.to_lowercase(), path.clone()).is_none() {
            self.by_name
                .entry(basename_key(&path))
                .or_default()
                .push(path);
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths
            .contains_key(&path.trim_start_matches('/').to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    fn lookup(&self, path: &str) -> Option<String> {
        with_extensions(path).into_iter().find_map(|candidate| {
            self.paths
                .get(&candidate.to_lowercase())
                .map(|e| e.value().clone())
        })
    }

    /// Resolve a link written in `source_path` to a stored path.
    ///
    /// Lookup order, all case-insensitive, each trying the link as written and
    /// with `.md` appended:
    /// 1. relative to the source's directory (skipped for `/`-rooted links)
    /// 2. from the vault root
    /// 3. any path ending in the link; shortest path wins, then lexicographic
    pub fn resolve(&self, link: &str, source_path: &str) -> Option<String> {
        let link = link.trim();
        if link.is_empty() {
            return None;
        }

        if !link.starts_with('/') {
            let relative = resolve_relative(source_path, link);
            if let Some(found) = self.lookup(&relative) {
                return Some(found);
            }
        }

        let absolute = join_segments("", link);
        if absolute.is_empty() {
            return None;
        }
        if let Some(found) = self.lookup(&absolute) {
            return Some(found);
        }

        self.resolve_by_suffix(&absolute)
    }

    fn resolve_by_suffix(&self, link_path: &str) -> Option<String> {
        with_extensions(link_path)
            .into_iter()
            .find_map(|candidate| {
                let lower = candidate.to_lowercase();
                let suffix = format!("/{}", lower);
                let named = self.by_name.get(&basename_key(&lower))?;
                let best = named
                    .iter()
                    .filter(|p| {
                        let p = p.to_lowercase();
                        p == lower || p.ends_with(&suffix)
                    })
                    .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
                    .cloned();
                best
            })
    }

    pub fn resolves(&self, link: &str, source_path: &str) -> bool {
        self.resolve(link, source_path).is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use arc_swap::ArcSwap;
    use std::sync::Arc;

    // === Test Helpers ===

    fn build_index(paths: &[&str]) -> VaultIndex {
        VaultIndex::from_paths(paths.iter().copied())
    }

    // === resolve_relative tests ===

    #[test]
    fn resolve_relative_sibling() {
        assert_eq!(resolve_relative("Notes/Source.md", "Ideas"), "Notes/Ideas");
    }

    #[test]
    fn resolve_relative_parent() {
        assert_eq!(resolve_relative("Notes/Source.md", "../Ideas"), "Ideas");
    }

    #[test]
    fn resolve_relative_never_climbs_above_root() {
        assert_eq!(resolve_relative("Source.md", "../../Ideas"), "Ideas");
    }

    #[test]
    fn resolve_relative_dot_segments() {
        assert_eq!(resolve_relative("Notes/Source.md", "./Sub/Ideas"), "Notes/Sub/Ideas");
    }

    // === from_paths tests ===

    #[test]
    fn from_paths_holds_exactly_the_listing() {
        let index = build_index(&["Notes/A.md", "Notes/A.md", "/Index.md"]);
        assert_eq!(index.len(), 2);
        assert!(index.contains("Index.md"));
        assert!(!index.contains("Notes/B.md"));
        assert!(VaultIndex::new().is_empty());
    }

    #[test]
    fn readers_keep_a_complete_index_while_another_is_built() {
        let paths: Vec<String> = (0..2000).map(|i| format!("Notes/N{}.md", i)).collect();
        let current = Arc::new(ArcSwap::from_pointee(VaultIndex::from_paths(paths.clone())));

        let reader = {
            let current = current.clone();
            std::thread::spawn(move || {
                (0..2000)
                    .filter(|_| !current.load().resolves("N5", "Notes/N0.md"))
                    .count()
            })
        };
        for _ in 0..50 {
            current.store(Arc::new(VaultIndex::from_paths(paths.clone())));
        }

        let misses = reader.join().unwrap();
        assert_eq!(misses, 0, "existing note reported unresolved while indexes were swapped");
    }

    #[test]
    fn contains_is_case_insensitive() {
        let index = build_index(&["Notes/Topic.md"]);
        assert!(index.contains("notes/topic.md"));
        assert!(index.contains("/Notes/Topic.md"));
    }

    // === resolve tests ===

    #[test]
    fn resolves_relative_before_absolute() {
        let index = build_index(&["Ideas.md", "Notes/Ideas.md"]);
        assert_eq!(
            index.resolve("Ideas", "Notes/Source.md").as_deref(),
            Some("Notes/Ideas.md")
        );
        assert_eq!(index.resolve("Ideas", "Source.md").as_deref(), Some("Ideas.md"));
    }

    #[test]
    fn rooted_link_skips_relative_lookup() {
        let index = build_index(&["Ideas.md", "Notes/Ideas.md"]);
        assert_eq!(
            index.resolve("/Ideas", "Notes/Source.md").as_deref(),
            Some("Ideas.md")
        );
    }

    #[test]
    fn resolves_by_basename_anywhere() {
        let index = build_index(&["Deep/Nested/Topic.md"]);
        assert_eq!(
            index.resolve("Topic", "Other/Note.md").as_deref(),
            Some("Deep/Nested/Topic.md")
        );
    }

    #[test]
    fn basename_match_prefers_shortest_path() {
        let index = build_index(&["a/b/c/Topic.md", "z/Topic.md", "y/Topic.md"]);
        assert_eq!(index.resolve("topic", "Note.md").as_deref(), Some("y/Topic.md"));
    }

    #[test]
    fn resolves_partial_path_suffix() {
        let index = build_index(&["Projects/Sub/Plan.md", "Other/Plan.md"]);
        assert_eq!(
            index.resolve("Sub/Plan", "Note.md").as_deref(),
            Some("Projects/Sub/Plan.md")
        );
    }

    #[test]
    fn resolves_explicit_extension_and_attachments() {
        let index = build_index(&["Notes/Topic.md", "assets/diagram.png"]);
        assert!(index.resolves("Notes/Topic.md", "x.md"));
        assert!(index.resolves("diagram.png", "x.md"));
    }

    #[test]
    fn unknown_link_does_not_resolve() {
        let index = build_index(&["Notes/Topic.md"]);
        assert!(index.resolve("Missing", "Notes/A.md").is_none());
        assert!(index.resolve("", "Notes/A.md").is_none());
    }

    #[test]
    fn case_insensitive_resolution_returns_stored_case() {
        let index = build_index(&["Notes/Topic.md"]);
        assert_eq!(
            index.resolve("TOPIC", "Notes/A.md").as_deref(),
            Some("Notes/Topic.md")
        );
    }
}
