use crate::grouping::{group_by_folder, FolderGroups};
use crate::link::UnresolvedLinkInfo;
use crate::ranking::{sort_links, SortPolicy};
use serde::Serialize;

/// Keep entries whose link text contains `query`, ignoring case.
///
/// Relative order is preserved. An empty query keeps everything.
pub fn filter_links<'a, I>(entries: I, query: &str) -> Vec<&'a UnresolvedLinkInfo>
where
    I: IntoIterator<Item = &'a UnresolvedLinkInfo>,
{
    if query.is_empty() {
        return entries.into_iter().collect();
    }
    let needle = query.to_lowercase();
    entries
        .into_iter()
        .filter(|e| e.link_text.to_lowercase().contains(&needle))
        .collect()
}

/// How a presentation layer wants the registry shown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewOptions {
    pub query: String,
    pub sort: SortPolicy,
    /// Keep only the first `limit` entries after ranking.
    pub limit: Option<usize>,
    pub group_by_folder: bool,
}

/// A projection of the registry ready for rendering.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum LinkView<'a> {
    Flat(Vec<&'a UnresolvedLinkInfo>),
    Grouped(FolderGroups<'a>),
}

impl LinkView<'_> {
    pub fn link_count(&self) -> usize {
        match self {
            LinkView::Flat(links) => links.len(),
            LinkView::Grouped(groups) => groups.link_count(),
        }
    }
}

impl ViewOptions {
    /// Filter, then sort, then truncate. Ranking only sees the filtered entries.
    pub fn select<'a, I>(&self, entries: I) -> Vec<&'a UnresolvedLinkInfo>
    where
        I: IntoIterator<Item = &'a UnresolvedLinkInfo>,
    {
        let filtered = filter_links(entries, &self.query);
        let mut sorted = sort_links(filtered, self.sort);
        if let Some(limit) = self.limit {
            sorted.truncate(limit);
        }
        sorted
    }

    /// [`ViewOptions::select`], then group by folder if asked. Grouping keeps
    /// the ranked order inside each folder.
    pub fn project<'a, I>(&self, entries: I) -> LinkView<'a>
    where
        I: IntoIterator<Item = &'a UnresolvedLinkInfo>,
    {
        let sorted = self.select(entries);
        if self.group_by_folder {
            LinkView::Grouped(group_by_folder(sorted))
        } else {
            LinkView::Flat(sorted)
        }
    }
}
