use crate::link::UnresolvedLinkInfo;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Key of a folder group.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FolderKey {
    /// Directory of the canonical source path; `""` is the vault root.
    Path(String),
    /// Entries that have no source file at all.
    NoSource,
}

impl FolderKey {
    /// Directory portion of a `/`-separated path: everything before the last `/`.
    pub fn for_path(path: &str) -> Self {
        let dir = path.rfind('/').map(|idx| &path[..idx]).unwrap_or("");
        FolderKey::Path(dir.to_string())
    }
}

impl fmt::Display for FolderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FolderKey::Path(p) if p.is_empty() => f.write_str("/"),
            FolderKey::Path(p) => f.write_str(p),
            FolderKey::NoSource => f.write_str("(no source folder)"),
        }
    }
}

impl Serialize for FolderKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FolderKey::Path(p) => serializer.serialize_some(p),
            FolderKey::NoSource => serializer.serialize_none(),
        }
    }
}

/// Entries filed under one folder, in the order they were grouped.
#[derive(Clone, Debug, Serialize)]
pub struct FolderGroup<'a> {
    pub folder: FolderKey,
    pub links: Vec<&'a UnresolvedLinkInfo>,
}

/// Folder groups in first-encounter order.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct FolderGroups<'a> {
    groups: Vec<FolderGroup<'a>>,
    #[serde(skip)]
    index: HashMap<FolderKey, usize>,
}

impl<'a> FolderGroups<'a> {
    fn push(&mut self, folder: FolderKey, link: &'a UnresolvedLinkInfo) {
        match self.index.get(&folder) {
            Some(&idx) => self.groups[idx].links.push(link),
            None => {
                self.index.insert(folder.clone(), self.groups.len());
                self.groups.push(FolderGroup {
                    folder,
                    links: vec![link],
                });
            }
        }
    }

    pub fn get(&self, folder: &FolderKey) -> Option<&[&'a UnresolvedLinkInfo]> {
        self.index
            .get(folder)
            .map(|&idx| self.groups[idx].links.as_slice())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FolderGroup<'a>> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of entries across all groups.
    pub fn link_count(&self) -> usize {
        self.groups.iter().map(|g| g.links.len()).sum()
    }
}

impl<'g, 'a> IntoIterator for &'g FolderGroups<'a> {
    type Item = &'g FolderGroup<'a>;
    type IntoIter = std::slice::Iter<'g, FolderGroup<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Partition entries by the folder of their first recorded source.
///
/// A link referenced from several folders is filed only under the folder of
/// the document that referenced it first. Groups are not sorted: they appear
/// in the order their first entry appears in `entries`.
pub fn group_by_folder<'a, I>(entries: I) -> FolderGroups<'a>
where
    I: IntoIterator<Item = &'a UnresolvedLinkInfo>,
{
    let mut groups = FolderGroups::default();
    for entry in entries {
        let folder = match entry.canonical_source() {
            Some(path) => FolderKey::for_path(path),
            None => FolderKey::NoSource,
        };
        groups.push(folder, entry);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str, sources: &[&str]) -> UnresolvedLinkInfo {
        UnresolvedLinkInfo {
            link_text: text.to_string(),
            frequency: sources.len().max(1),
            source_files: sources.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn folder(p: &str) -> FolderKey {
        FolderKey::Path(p.to_string())
    }

    #[test]
    fn folder_key_for_nested_and_root_paths() {
        assert_eq!(FolderKey::for_path("Notes/Sub/A.md"), folder("Notes/Sub"));
        assert_eq!(FolderKey::for_path("A.md"), folder(""));
        assert_eq!(folder("").to_string(), "/");
    }

    #[test]
    fn scenario_c_single_notes_group() {
        let entries = vec![
            entry("Topic X", &["Notes/A.md", "Notes/B.md"]),
            entry("Topic Y", &["Notes/B.md"]),
        ];
        let groups = group_by_folder(&entries);
        assert_eq!(groups.len(), 1);
        let notes = groups.get(&folder("Notes")).expect("Notes group");
        let texts: Vec<&str> = notes.iter().map(|e| e.link_text.as_str()).collect();
        assert_eq!(texts, vec!["Topic X", "Topic Y"]);
    }

    #[test]
    fn files_under_first_source_only() {
        let entries = vec![entry("Shared", &["Projects/P.md", "Journal/J.md"])];
        let groups = group_by_folder(&entries);
        assert!(groups.get(&folder("Projects")).is_some());
        assert!(groups.get(&folder("Journal")).is_none());
    }

    #[test]
    fn groups_follow_encounter_order_not_alphabetical() {
        let entries = vec![
            entry("one", &["Zoo/a.md"]),
            entry("two", &["Apple/b.md"]),
            entry("three", &["Zoo/c.md"]),
            entry("four", &["root.md"]),
        ];
        let groups = group_by_folder(&entries);
        let keys: Vec<String> = groups.iter().map(|g| g.folder.to_string()).collect();
        assert_eq!(keys, vec!["Zoo", "Apple", "/"]);
        let zoo: Vec<&str> = groups
            .get(&folder("Zoo"))
            .unwrap()
            .iter()
            .map(|e| e.link_text.as_str())
            .collect();
        assert_eq!(zoo, vec!["one", "three"]);
    }

    #[test]
    fn entry_without_sources_uses_sentinel_not_root() {
        let entries = vec![entry("orphan", &[]), entry("rooted", &["index.md"])];
        let groups = group_by_folder(&entries);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.get(&FolderKey::NoSource).unwrap()[0].link_text, "orphan");
        assert_eq!(groups.get(&folder("")).unwrap()[0].link_text, "rooted");
    }

    #[test]
    fn every_entry_lands_in_exactly_one_group() {
        let entries = vec![
            entry("a", &["x/1.md"]),
            entry("b", &["y/2.md", "x/1.md"]),
            entry("c", &[]),
            entry("d", &["3.md"]),
            entry("e", &["x/4.md"]),
        ];
        let groups = group_by_folder(&entries);
        assert_eq!(groups.link_count(), entries.len());
        for e in &entries {
            let hits = groups
                .iter()
                .filter(|g| g.links.iter().any(|l| l.link_text == e.link_text))
                .count();
            assert_eq!(hits, 1, "{} appears in {} groups", e.link_text, hits);
        }
    }

    #[test]
    fn empty_input_has_no_groups() {
        let entries: Vec<UnresolvedLinkInfo> = Vec::new();
        let groups = group_by_folder(&entries);
        assert!(groups.is_empty());
        assert_eq!(groups.link_count(), 0);
    }

    #[test]
    fn serializes_as_ordered_list() {
        let entries = vec![entry("a", &["x/1.md"]), entry("b", &[])];
        let json = serde_json::to_value(group_by_folder(&entries)).unwrap();
        assert_eq!(json[0]["folder"], "x");
        assert!(json[1]["folder"].is_null());
        assert_eq!(json[0]["links"][0]["link_text"], "a");
    }
}
