use crate::link::LinkReference;
use regex::Regex;
use std::sync::LazyLock;

// Compile regex once, reuse across calls
static WIKILINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[([^\]]+)\]\]").unwrap()
});

static MARKDOWN_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[([^\[\]]*)\]\((?:<([^>]+)>|([^)\s]+))(?:\s+"[^"]*")?\)"#).unwrap()
});

static FENCED_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[^\n]*\n.*?```|~~~[^\n]*\n.*?~~~").unwrap()
});

static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"`[^`]*`").unwrap()
});

/// Build a set of byte ranges that are inside code blocks or inline code.
fn build_excluded_ranges(markdown: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    for m in FENCED_CODE_RE.find_iter(markdown) {
        ranges.push((m.start(), m.end()));
    }
    for m in INLINE_CODE_RE.find_iter(markdown) {
        ranges.push((m.start(), m.end()));
    }
    ranges
}

/// Returns true if the byte offset falls within any excluded range.
fn is_excluded(offset: usize, excluded: &[(usize, usize)]) -> bool {
    excluded.iter().any(|&(start, end)| offset >= start && offset < end)
}

/// Embeds (`![[...]]`, `![](...)`) are not links.
fn is_embed(markdown: &str, offset: usize) -> bool {
    offset > 0 && markdown.as_bytes()[offset - 1] == b'!'
}

/// Parse the inside of `[[...]]` into a reference.
///
/// The target is the part before any `#` or `|`; the alias after `|` becomes
/// the display text. Same-note links (`[[#Heading]]`) yield `None`.
fn parse_wikilink_content(content: &str) -> Option<LinkReference> {
    let (target_part, alias) = match content.find('|') {
        Some(pipe_idx) => (&content[..pipe_idx], Some(content[pipe_idx + 1..].trim())),
        None => (content, None),
    };
    let name = target_part
        .find('#')
        .map(|hash_idx| &target_part[..hash_idx])
        .unwrap_or(target_part)
        .trim();
    if name.is_empty() {
        return None;
    }

    Some(LinkReference {
        raw_target: name.to_string(),
        display_text: alias.filter(|a| !a.is_empty()).map(str::to_string),
    })
}

/// Parse a markdown link destination into a vault-local target.
///
/// External URLs, `mailto:` and pure anchors are not vault links.
fn parse_markdown_target(destination: &str) -> Option<String> {
    let destination = destination.trim();
    if destination.is_empty()
        || destination.starts_with('#')
        || destination.contains("://")
        || destination.starts_with("mailto:")
    {
        return None;
    }
    let without_anchor = destination
        .find('#')
        .map(|idx| &destination[..idx])
        .unwrap_or(destination);
    let decoded = urlencoding::decode(without_anchor)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| without_anchor.to_string());
    let trimmed = decoded.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Extract wikilinks from markdown text, with aliases as display text.
/// Ignores links inside code blocks and inline code, and embeds.
pub fn extract_wikilinks(markdown: &str) -> Vec<LinkReference> {
    extract_wikilinks_at(markdown, &build_excluded_ranges(markdown))
        .into_iter()
        .map(|(_, link)| link)
        .collect()
}

fn extract_wikilinks_at(
    markdown: &str,
    excluded: &[(usize, usize)],
) -> Vec<(usize, LinkReference)> {
    let mut links = Vec::new();
    for cap in WIKILINK_RE.captures_iter(markdown) {
        let Some(full_match) = cap.get(0) else {
            continue;
        };
        // Skip if this match starts inside an excluded range
        if is_excluded(full_match.start(), excluded) || is_embed(markdown, full_match.start()) {
            continue;
        }
        if let Some(link) = parse_wikilink_content(&cap[1]) {
            links.push((full_match.start(), link));
        }
    }
    links
}

/// Extract inline markdown links (`[label](Some%20Note.md)`) that point into the vault.
pub fn extract_markdown_links(markdown: &str) -> Vec<LinkReference> {
    extract_markdown_links_at(markdown, &build_excluded_ranges(markdown))
        .into_iter()
        .map(|(_, link)| link)
        .collect()
}

fn extract_markdown_links_at(
    markdown: &str,
    excluded: &[(usize, usize)],
) -> Vec<(usize, LinkReference)> {
    let mut links = Vec::new();
    for cap in MARKDOWN_LINK_RE.captures_iter(markdown) {
        let Some(full_match) = cap.get(0) else {
            continue;
        };
        if is_excluded(full_match.start(), excluded) || is_embed(markdown, full_match.start()) {
            continue;
        }
        let destination = cap.get(2).or_else(|| cap.get(3)).map(|m| m.as_str()).unwrap_or("");
        let Some(target) = parse_markdown_target(destination) else {
            continue;
        };
        let label = cap[1].trim();
        links.push((
            full_match.start(),
            LinkReference {
                raw_target: target,
                display_text: (!label.is_empty()).then(|| label.to_string()),
            },
        ));
    }
    links
}

/// All outgoing link references of a document, in document order.
pub fn extract_link_references(markdown: &str) -> Vec<LinkReference> {
    let excluded = build_excluded_ranges(markdown);
    let mut links = extract_wikilinks_at(markdown, &excluded);
    links.extend(extract_markdown_links_at(markdown, &excluded));
    links.sort_by_key(|(offset, _)| *offset);
    links.into_iter().map(|(_, link)| link).collect()
}
