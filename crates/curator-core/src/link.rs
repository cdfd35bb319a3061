use serde::{Deserialize, Serialize};

/// One cross-reference found in one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkReference {
    /// Link target as written, without anchor: "Notes/Topic" from `[[Notes/Topic#Intro]]`
    pub raw_target: String,
    /// Author-supplied label, e.g. the alias in `[[Topic|label]]`
    pub display_text: Option<String>,
}

impl LinkReference {
    pub fn new(raw_target: impl Into<String>) -> Self {
        Self {
            raw_target: raw_target.into(),
            display_text: None,
        }
    }

    pub fn with_display(raw_target: impl Into<String>, display_text: impl Into<String>) -> Self {
        Self {
            raw_target: raw_target.into(),
            display_text: Some(display_text.into()),
        }
    }

    /// The deduplication key: the label if one was given, otherwise the raw target.
    ///
    /// Returns `None` when neither carries any text.
    pub fn link_text(&self) -> Option<&str> {
        match self.display_text.as_deref() {
            Some(label) if !label.trim().is_empty() => Some(label),
            _ if !self.raw_target.trim().is_empty() => Some(&self.raw_target),
            _ => None,
        }
    }
}

/// Aggregated occurrences of one unresolved link across the vault.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedLinkInfo {
    pub link_text: String,
    /// Number of unresolved references, counting repeats within one document.
    pub frequency: usize,
    /// Documents containing the link, in first-seen order, without duplicates.
    pub source_files: Vec<String>,
}

impl UnresolvedLinkInfo {
    pub(crate) fn first_seen(link_text: &str, source_path: &str) -> Self {
        Self {
            link_text: link_text.to_string(),
            frequency: 1,
            source_files: vec![source_path.to_string()],
        }
    }

    pub(crate) fn record(&mut self, source_path: &str) {
        self.frequency += 1;
        if !self.source_files.iter().any(|p| p == source_path) {
            self.source_files.push(source_path.to_string());
        }
    }

    /// The source path that decides this entry's folder group.
    pub fn canonical_source(&self) -> Option<&str> {
        self.source_files.first().map(String::as_str)
    }
}
