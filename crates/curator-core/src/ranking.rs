use crate::link::UnresolvedLinkInfo;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Ordering applied to registry entries.
///
/// Parsing never fails: unknown names select [`SortPolicy::Frequency`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SortPolicy {
    /// Most referenced first.
    #[default]
    Frequency,
    /// Ascending by link text, locale-aware.
    Alphabetical,
}

impl From<&str> for SortPolicy {
    fn from(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "alphabetical" | "alpha" | "name" => SortPolicy::Alphabetical,
            _ => SortPolicy::Frequency,
        }
    }
}

impl From<String> for SortPolicy {
    fn from(name: String) -> Self {
        SortPolicy::from(name.as_str())
    }
}

impl FromStr for SortPolicy {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SortPolicy::from(s))
    }
}

impl fmt::Display for SortPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortPolicy::Frequency => f.write_str("frequency"),
            SortPolicy::Alphabetical => f.write_str("alphabetical"),
        }
    }
}

/// Collation key approximating a locale-aware comparison: accents and
/// non-Latin scripts are transliterated, then case is folded.
fn collation_key(text: &str) -> String {
    deunicode::deunicode(text).to_lowercase()
}

/// Return the entries in `policy` order without touching the input.
///
/// Both policies use a stable sort, so equal entries keep their input order
/// and sorting an already sorted sequence is a no-op. Alphabetical order
/// falls back to the raw text when collation keys are equal, so it is total
/// for distinct strings.
pub fn sort_links<'a, I>(entries: I, policy: SortPolicy) -> Vec<&'a UnresolvedLinkInfo>
where
    I: IntoIterator<Item = &'a UnresolvedLinkInfo>,
{
    match policy {
        SortPolicy::Frequency => {
            let mut sorted: Vec<&UnresolvedLinkInfo> = entries.into_iter().collect();
            sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency));
            sorted
        }
        SortPolicy::Alphabetical => {
            let mut keyed: Vec<(String, &UnresolvedLinkInfo)> = entries
                .into_iter()
                .map(|e| (collation_key(&e.link_text), e))
                .collect();
            keyed.sort_by(|(ka, a), (kb, b)| {
                ka.cmp(kb).then_with(|| a.link_text.cmp(&b.link_text))
            });
            keyed.into_iter().map(|(_, e)| e).collect()
        }
    }
}
