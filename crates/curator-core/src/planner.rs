use crate::link::UnresolvedLinkInfo;
use crate::template::{render, PromptTemplate, UnmatchedPlaceholders};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Characters the host editor refuses in note file names.
const FORBIDDEN_FILENAME_CHARS: &[char] = &[
    '*', '"', '\\', '/', '<', '>', ':', '|', '?', '#', '^', '[', ']',
];

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("prompt template {0:?} is empty")]
    EmptyTemplate(String),
}

/// A note that a batch action would create for one unresolved link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NotePlan {
    pub link_text: String,
    /// Vault-relative path of the note to create.
    pub note_path: String,
    pub prompt: String,
    pub frequency: usize,
}

/// File name for a new note titled `link_text`.
pub fn note_file_name(link_text: &str) -> String {
    let cleaned: String = link_text
        .trim()
        .chars()
        .map(|c| if FORBIDDEN_FILENAME_CHARS.contains(&c) { '-' } else { c })
        .collect();
    format!("{}.md", cleaned)
}

/// Vault-relative path under `folder` (`""` = vault root).
pub fn note_path(folder: &str, link_text: &str) -> String {
    let folder = folder.trim_matches('/');
    let file = note_file_name(link_text);
    if folder.is_empty() {
        file
    } else {
        format!("{}/{}", folder, file)
    }
}

/// Plan one new note per selected entry, in the given order.
///
/// The prompt sees `{{title}}` (the link text) and `{{sources}}` (the
/// referencing documents, comma separated).
pub fn plan_notes<'a, I>(
    entries: I,
    template: &PromptTemplate,
    folder: &str,
    unmatched: UnmatchedPlaceholders,
) -> Result<Vec<NotePlan>, PlanError>
where
    I: IntoIterator<Item = &'a UnresolvedLinkInfo>,
{
    if template.prompt.trim().is_empty() {
        return Err(PlanError::EmptyTemplate(template.name.clone()));
    }

    let plans = entries
        .into_iter()
        .map(|entry| {
            let bindings: HashMap<&str, String> = HashMap::from([
                ("title", entry.link_text.clone()),
                ("sources", entry.source_files.join(", ")),
            ]);
            NotePlan {
                link_text: entry.link_text.clone(),
                note_path: note_path(folder, &entry.link_text),
                prompt: render(&template.prompt, &bindings, unmatched),
                frequency: entry.frequency,
            }
        })
        .collect();
    Ok(plans)
}
