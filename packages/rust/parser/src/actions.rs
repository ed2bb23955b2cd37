//! Suggested-actions parser and the action-detail sub-parser.
//!
//! Actions are kept as opaque line blocks while parsing the section; the
//! typed [`ActionDetails`] view is produced once, by [`parse_action_details`].

use briefbuilder_shared::{ActionDetails, ActionRecord};

use crate::signals::extract_link;

/// Glyph that opens a new action.
pub const ACTION_START: &str = "✅";

const TIME_MARKER: &str = "• Time Estimate:";
const OUTCOME_MARKER: &str = "• Expected Outcome:";
const DESCRIPTION_MARKER: &str = "• Description:";
const LINK_MARKER: &str = "• Link:";

/// Split the actions section body into one record per start glyph.
///
/// Non-empty lines are kept verbatim; anything before the first start glyph
/// is ignored.
pub fn parse_actions(body: &str) -> Vec<ActionRecord> {
    let mut records = Vec::new();
    let mut current: Option<ActionRecord> = None;

    for line in body.lines() {
        if line.trim_start().starts_with(ACTION_START) {
            if let Some(record) = current.take() {
                records.push(record);
            }
            current = Some(ActionRecord {
                lines: vec![line.to_string()],
            });
        } else if let Some(record) = current.as_mut() {
            if !line.trim().is_empty() {
                record.lines.push(line.to_string());
            }
        }
    }

    if let Some(record) = current.take() {
        records.push(record);
    }

    records
}

/// Decompose an action block into its typed fields.
pub fn parse_action_details(action: &ActionRecord) -> ActionDetails {
    let mut details = ActionDetails::default();

    let Some((first, rest)) = action.lines.split_first() else {
        return details;
    };

    let (status, title) = split_status(first.trim());
    details.status = status.to_string();
    details.title = title.replace("**", "").trim().to_string();

    for line in rest {
        if let Some(value) = value_after(line, TIME_MARKER) {
            details.time_estimate = non_empty(value);
        } else if let Some(value) = value_after(line, OUTCOME_MARKER) {
            details.outcome = non_empty(value);
        } else if let Some(value) = value_after(line, DESCRIPTION_MARKER) {
            details.description = non_empty(value);
        } else if let Some(value) = value_after(line, LINK_MARKER) {
            details.link = non_empty(&extract_link(value));
        }
    }

    details
}

/// Separate the leading status glyph from the action title.
///
/// The status is the run of leading characters that are neither alphanumeric
/// nor `*`, so a title glued to the glyph stays whole.
fn split_status(line: &str) -> (&str, &str) {
    let end = line
        .find(|c: char| c.is_alphanumeric() || c == '*')
        .unwrap_or(line.len());
    let (head, tail) = line.split_at(end);
    (head.trim(), tail)
}

fn value_after<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.find(marker).map(|idx| line[idx + marker.len()..].trim())
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "Intro line that is not an action\n\n✅ **First action**\n• Time Estimate: 45 minutes\n\n• Expected Outcome: Learn X\n• Link: [Docs](https://example.com/docs)\n• Description: Do the thing.\n✅ **Second action**\n• Time Estimate: 30 minutes";

    #[test]
    fn splits_on_start_glyph() {
        let actions = parse_actions(BODY);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].lines.len(), 5, "blank lines are skipped");
        assert_eq!(actions[0].lines[0], "✅ **First action**");
        assert_eq!(
            actions[1].lines,
            vec!["✅ **Second action**", "• Time Estimate: 30 minutes"]
        );
    }

    #[test]
    fn lines_are_kept_verbatim() {
        let actions = parse_actions("✅ A\n   • Time Estimate:  10 min  ");
        assert_eq!(actions[0].lines[1], "   • Time Estimate:  10 min  ");
    }

    #[test]
    fn empty_body_has_no_actions() {
        assert!(parse_actions("").is_empty());
        assert!(parse_actions("no glyph here").is_empty());
    }

    #[test]
    fn details_extract_every_field() {
        let actions = parse_actions(BODY);
        let details = parse_action_details(&actions[0]);

        assert_eq!(details.status, "✅");
        assert_eq!(details.title, "First action");
        assert_eq!(details.time_estimate.as_deref(), Some("45 minutes"));
        assert_eq!(details.outcome.as_deref(), Some("Learn X"));
        assert_eq!(details.description.as_deref(), Some("Do the thing."));
        assert_eq!(details.link.as_deref(), Some("https://example.com/docs"));
    }

    #[test]
    fn details_leave_missing_fields_unset() {
        let actions = parse_actions("✅ **Bare action**\n• Description:");
        let details = parse_action_details(&actions[0]);

        assert_eq!(details.title, "Bare action");
        assert!(details.time_estimate.is_none());
        assert!(details.outcome.is_none());
        assert!(details.description.is_none());
    }

    #[test]
    fn glyph_without_space() {
        let actions = parse_actions("✅**Tight**");
        let details = parse_action_details(&actions[0]);
        assert_eq!(details.status, "✅");
        assert_eq!(details.title, "Tight");
    }

    #[test]
    fn glyph_without_space_multi_word_title() {
        let actions = parse_actions("✅**Build a RAG demo**\n• Time Estimate: 1 hour");
        let details = parse_action_details(&actions[0]);
        assert_eq!(details.status, "✅");
        assert_eq!(details.title, "Build a RAG demo");
        assert_eq!(details.time_estimate.as_deref(), Some("1 hour"));
    }

    #[test]
    fn spaced_glyph_keeps_full_title() {
        let record = ActionRecord {
            lines: vec!["✅ **Port the triage agent**".into()],
        };
        let details = parse_action_details(&record);
        assert_eq!(details.status, "✅");
        assert_eq!(details.title, "Port the triage agent");
    }

    #[test]
    fn empty_record_has_default_details() {
        let details = parse_action_details(&ActionRecord::default());
        assert_eq!(details, ActionDetails::default());
    }
}
