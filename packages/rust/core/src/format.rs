//! Content formatter: aligned items → grouped, human-readable text lines.
//!
//! Every line starts with a fixed glyph so the block builder can classify it
//! without re-parsing fields.

use serde::Serialize;
use tracing::{debug, instrument};

use briefbuilder_parser::{DIVIDER, parse_action_details};
use briefbuilder_shared::{ActionDetails, AlignedItem, ItemOrder};

pub const TITLE_ICON: &str = "🔹";
pub const SOURCE_ICON: &str = "📍";
pub const RATIONALE_ICON: &str = "💡";
pub const TAGS_ICON: &str = "🏷";
pub const SCORE_ICON: &str = "🎯";
pub const ACTION_ICON: &str = "✅";
pub const NO_ACTION_ICON: &str = "📌";
pub const LINK_ICON: &str = "🔗";
pub const BULLET: &str = "• ";

/// Placeholder for a field the alignment could not fill.
const NOT_AVAILABLE: &str = "N/A";

/// The formatted lines of one item, title line first, divider last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedGroup {
    pub title: String,
    pub lines: Vec<String>,
}

/// Format aligned items into line groups in the requested order.
#[instrument(skip_all, fields(items = items.len(), order = ?order))]
pub fn format_items(items: &[AlignedItem], order: ItemOrder) -> Vec<FormattedGroup> {
    let mut ordered: Vec<&AlignedItem> = items.iter().collect();
    if order == ItemOrder::ScoreDescending {
        // stable: equal ranks keep input order
        ordered.sort_by(|a, b| b.rank().cmp(&a.rank()));
    }

    let groups: Vec<FormattedGroup> = ordered.into_iter().map(format_item).collect();
    debug!(groups = groups.len(), "items formatted");
    groups
}

fn format_item(item: &AlignedItem) -> FormattedGroup {
    let signal = &item.signal;
    let mut lines = vec![
        format!("{TITLE_ICON} **{}**", signal.title),
        labelled(SOURCE_ICON, "Source", &signal.source),
        labelled(RATIONALE_ICON, "Why it matters", &signal.rationale),
    ];

    match &item.score {
        Some(record) => {
            let tags = if record.tags.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                format_tags(&record.tags)
            };
            lines.push(labelled(TAGS_ICON, "Tags", &tags));
            lines.push(labelled(SCORE_ICON, "Relevance Score", &record.score.to_string()));

            let explanation = record.explanation.trim();
            if !explanation.is_empty() && explanation != signal.rationale.trim() {
                lines.push(explanation.to_string());
            }
        }
        None => {
            lines.push(labelled(TAGS_ICON, "Tags", NOT_AVAILABLE));
            lines.push(labelled(SCORE_ICON, "Relevance Score", NOT_AVAILABLE));
        }
    }

    match &item.action {
        Some(action) => lines.extend(action_lines(&parse_action_details(action))),
        None => lines.push(format!(
            "{NO_ACTION_ICON} No specific action generated - bookmark for future reference."
        )),
    }

    if !signal.link.is_empty() {
        lines.push(format!("{BULLET}[{LINK_ICON} Read more]({})", signal.link));
    }

    lines.push(DIVIDER.to_string());

    FormattedGroup {
        title: signal.title.clone(),
        lines,
    }
}

fn action_lines(details: &ActionDetails) -> Vec<String> {
    let mut lines = vec![format!("{ACTION_ICON} Suggested Action:")];
    if !details.title.is_empty() {
        lines.push(details.title.clone());
    }
    if let Some(time) = &details.time_estimate {
        lines.push(format!("{BULLET}Time: {time}"));
    }
    if let Some(outcome) = &details.outcome {
        lines.push(format!("{BULLET}Outcome: {outcome}"));
    }
    if let Some(description) = &details.description {
        lines.push(format!("{BULLET}{description}"));
    }
    lines
}

fn labelled(icon: &str, label: &str, value: &str) -> String {
    format!("{icon} {label}: {value}").trim_end().to_string()
}

/// Join bare tags for display: `["agents", "rag"]` → `"agents, rag"`.
pub fn format_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// Render the groups as one text document, blank line between groups.
pub fn to_text(groups: &[FormattedGroup]) -> String {
    groups
        .iter()
        .map(|g| g.lines.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}
