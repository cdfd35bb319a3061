use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").unwrap()
});

/// A named prompt used to generate a new note.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub name: String,
    pub prompt: String,
}

impl PromptTemplate {
    pub fn new(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
        }
    }

    /// The template shipped when nothing is configured.
    pub fn default_summary() -> Self {
        Self::new(
            "Default Summary",
            "Please provide a comprehensive summary of the topic: {{title}}.",
        )
    }
}

/// What happens to a `{{key}}` with no binding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPlaceholders {
    /// Leave the placeholder in the output verbatim.
    #[default]
    Keep,
    /// Remove the placeholder.
    Strip,
}

/// Substitute `{{key}}` placeholders from `bindings`.
///
/// Whitespace inside the braces is ignored. Substituted values are not
/// rescanned for placeholders.
pub fn render(
    template: &str,
    bindings: &HashMap<&str, String>,
    unmatched: UnmatchedPlaceholders,
) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| match bindings.get(&caps[1]) {
            Some(value) => value.clone(),
            None => match unmatched {
                UnmatchedPlaceholders::Keep => caps[0].to_string(),
                UnmatchedPlaceholders::Strip => String::new(),
            },
        })
        .into_owned()
}
