use colored::Colorize;
use curator_core::aggregator::ScanStats;
use curator_core::planner::NotePlan;
use curator_core::template::PromptTemplate;
use curator_core::{LinkView, UnresolvedLinkInfo};
use serde::Serialize;

/// Machine-readable output of `scan --json`.
#[derive(Serialize)]
pub struct ScanReport<'a> {
    pub stats: &'a ScanStats,
    pub links: &'a LinkView<'a>,
}

pub fn render_summary(stats: &ScanStats, distinct: usize) -> String {
    let mut output = format!(
        "{} unresolved links ({} references) in {} documents\n",
        distinct.to_string().bold(),
        stats.unresolved,
        stats.documents
    );
    if stats.malformed_skipped > 0 {
        output.push_str(&format!(
            "{}\n",
            format!("skipped {} links without a target", stats.malformed_skipped).yellow()
        ));
    }
    output
}

fn render_link(output: &mut String, link: &UnresolvedLinkInfo, indent: &str) {
    output.push_str(&format!(
        "{}- {} {} <- {}\n",
        indent,
        link.link_text.bold(),
        format!("({})", link.frequency).yellow(),
        link.source_files.join(", ").dimmed()
    ));
}

/// Text rendering of a flat or grouped view.
pub fn render_view(view: &LinkView<'_>) -> String {
    let mut output = String::new();
    match view {
        LinkView::Flat(links) => {
            if links.is_empty() {
                output.push_str("- (none)\n");
            }
            for link in links {
                render_link(&mut output, link, "");
            }
        }
        LinkView::Grouped(groups) => {
            if groups.is_empty() {
                output.push_str("- (none)\n");
            }
            for group in groups {
                output.push_str(&format!(
                    "\n{} {}\n",
                    group.folder.to_string().blue().bold(),
                    format!("[{}]", group.links.len()).dimmed()
                ));
                for link in &group.links {
                    render_link(&mut output, link, "  ");
                }
            }
        }
    }
    output
}

pub fn render_plans(plans: &[NotePlan]) -> String {
    let mut output = String::new();
    if plans.is_empty() {
        output.push_str("Nothing to create.\n");
        return output;
    }
    output.push_str(&format!("Would create {} notes:\n", plans.len()));
    for plan in plans {
        output.push_str(&format!(
            "\n{} -> {} {}\n",
            plan.link_text.bold(),
            plan.note_path.green(),
            format!("({} references)", plan.frequency).dimmed()
        ));
        for line in plan.prompt.lines() {
            output.push_str(&format!("  > {}\n", line));
        }
    }
    output
}

pub fn render_templates(templates: &[PromptTemplate], default: Option<&str>) -> String {
    let mut output = String::new();
    if templates.is_empty() {
        output.push_str("- (none)\n");
    }
    for (i, template) in templates.iter().enumerate() {
        let is_default = match default {
            Some(name) => name == template.name,
            None => i == 0,
        };
        let marker = if is_default { " (default)" } else { "" };
        output.push_str(&format!("- {}{}\n  {}\n", template.name.bold(), marker, template.prompt));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use curator_core::{group_by_folder, UnresolvedLinkInfo};

    fn entry(text: &str, frequency: usize, sources: &[&str]) -> UnresolvedLinkInfo {
        UnresolvedLinkInfo {
            link_text: text.to_string(),
            frequency,
            source_files: sources.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn flat_view_lists_links_with_counts_and_sources() {
        plain();
        let entries = vec![entry("Topic X", 2, &["Notes/A.md", "Notes/B.md"])];
        let view = LinkView::Flat(entries.iter().collect());
        let text = render_view(&view);
        assert_eq!(text, "- Topic X (2) <- Notes/A.md, Notes/B.md\n");
    }

    #[test]
    fn grouped_view_has_folder_headers() {
        plain();
        let entries = vec![
            entry("Topic X", 2, &["Notes/A.md"]),
            entry("Root Link", 1, &["Index.md"]),
        ];
        let view = LinkView::Grouped(group_by_folder(&entries));
        let text = render_view(&view);
        assert!(text.contains("\nNotes [1]\n  - Topic X (2)"), "got {text:?}");
        assert!(text.contains("\n/ [1]\n  - Root Link (1)"), "got {text:?}");
    }

    #[test]
    fn empty_view_says_none() {
        plain();
        assert_eq!(render_view(&LinkView::Flat(Vec::new())), "- (none)\n");
    }

    #[test]
    fn summary_mentions_malformed_links() {
        plain();
        let stats = ScanStats {
            documents: 3,
            references: 9,
            unresolved: 4,
            malformed_skipped: 1,
        };
        let text = render_summary(&stats, 2);
        assert!(text.starts_with("2 unresolved links (4 references) in 3 documents"));
        assert!(text.contains("skipped 1 links without a target"));
    }

    #[test]
    fn plans_show_path_and_prompt() {
        plain();
        let plans = vec![NotePlan {
            link_text: "Topic X".into(),
            note_path: "Inbox/Topic X.md".into(),
            prompt: "line one\nline two".into(),
            frequency: 2,
        }];
        let text = render_plans(&plans);
        assert!(text.contains("Topic X -> Inbox/Topic X.md (2 references)"));
        assert!(text.contains("  > line one\n  > line two\n"));
    }

    #[test]
    fn templates_mark_default() {
        plain();
        let templates = vec![PromptTemplate::new("A", "a"), PromptTemplate::new("B", "b")];
        let text = render_templates(&templates, Some("B"));
        assert!(text.contains("- A\n"));
        assert!(text.contains("- B (default)\n"));
    }
}
