//! Relevance section parser.
//!
//! Each entry opens with a bold title line followed by bullet fields:
//! ```text
//! **Title**
//! • Relevance Score: 8/10
//! • Tags: [agents] [rag]
//! • Explanation: one or two sentences
//! • Time to first working version: 2 hours
//! ```

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use briefbuilder_shared::{Score, ScoreRecord, ScoreTable};

/// First integer literal in a line.
static INTEGER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("integer regex"));

/// Bracketed tag: `[agents]`.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]*)\]").expect("tag regex"));

const SCORE_PREFIX: &str = "• Relevance Score:";
const TAGS_PREFIX: &str = "• Tags:";
const EXPLANATION_PREFIX: &str = "• Explanation:";
const TIME_PREFIX: &str = "• Time to first working version:";

/// Entry being accumulated.
struct PendingEntry {
    title: String,
    record: ScoreRecord,
    has_fields: bool,
}

/// Parse the relevance section body into an insertion-ordered table.
///
/// Titles that never receive a field line are dropped.
pub fn parse_scores(body: &str) -> ScoreTable {
    let mut table = ScoreTable::new();
    let mut current: Option<PendingEntry> = None;

    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(title) = bold_title(line) {
            flush(&mut table, current.take());
            current = Some(PendingEntry {
                title: title.to_string(),
                record: ScoreRecord::default(),
                has_fields: false,
            });
            continue;
        }

        let Some(entry) = current.as_mut() else {
            continue;
        };

        if let Some(rest) = line.strip_prefix(SCORE_PREFIX) {
            entry.record.score = parse_score(rest);
        } else if let Some(rest) = line.strip_prefix(TAGS_PREFIX) {
            entry.record.tags = parse_tags(rest);
        } else if let Some(rest) = line.strip_prefix(EXPLANATION_PREFIX) {
            entry.record.explanation = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix(TIME_PREFIX) {
            entry.record.time_estimate = Some(rest.trim().to_string());
        } else {
            continue;
        }
        entry.has_fields = true;
    }

    flush(&mut table, current.take());

    table
}

fn flush(table: &mut ScoreTable, entry: Option<PendingEntry>) {
    match entry {
        Some(entry) if entry.has_fields => table.insert(entry.title, entry.record),
        Some(entry) => debug!(title = %entry.title, "relevance entry without fields, dropped"),
        None => {}
    }
}

/// A line made entirely of `**bold**` text yields its inner title.
fn bold_title(line: &str) -> Option<&str> {
    let inner = line.strip_prefix("**")?.strip_suffix("**")?;
    let title = inner.trim_matches('*').trim();
    if title.is_empty() { None } else { Some(title) }
}

/// First integer literal in the text, or [`Score::Unknown`].
pub fn parse_score(text: &str) -> Score {
    first_integer(text).map_or(Score::Unknown, Score::Value)
}

pub(crate) fn first_integer(text: &str) -> Option<u32> {
    INTEGER_RE.find(text).and_then(|m| m.as_str().parse().ok())
}

/// Split a tag line into bare tags.
///
/// Bracketed tags (`[agents] [rag]`, `[agents], [rag]`) are taken from the
/// brackets; a plain list is split on commas.
pub fn parse_tags(text: &str) -> Vec<String> {
    let text = text.trim();

    let tags: Vec<String> = if text.contains('[') {
        TAG_RE
            .captures_iter(text)
            .map(|c| c[1].trim().to_string())
            .collect()
    } else {
        text.split(',').map(|t| t.trim().to_string()).collect()
    };

    tags.into_iter().filter(|t| !t.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entries_in_insertion_order() {
        let body = "**Zeta**\n• Relevance Score: 3\n\n**Alpha**\n• Relevance Score: 9";
        let table = parse_scores(body);

        let titles: Vec<&str> = table.titles().collect();
        assert_eq!(titles, vec!["Zeta", "Alpha"]);
        let scores: Vec<Score> = table.records().map(|r| r.score).collect();
        assert_eq!(scores, vec![Score::Value(3), Score::Value(9)]);
    }

    #[test]
    fn populates_all_fields() {
        let body = "**Title**\n• Relevance Score: 8/10\n• Tags: [agents] [rag]\n• Explanation: Useful.\n• Time to first working version: 2 hours";
        let table = parse_scores(body);
        let (title, record) = table.get_index(0).unwrap();

        assert_eq!(title, "Title");
        assert_eq!(record.score, Score::Value(8));
        assert_eq!(record.tags, vec!["agents", "rag"]);
        assert_eq!(record.explanation, "Useful.");
        assert_eq!(record.time_estimate.as_deref(), Some("2 hours"));
    }

    #[test]
    fn score_without_integer_is_unknown() {
        assert_eq!(parse_score(" high"), Score::Unknown);
        assert_eq!(parse_score(""), Score::Unknown);
        assert_eq!(parse_score(" [1–10]"), Score::Value(1));
        assert_eq!(parse_score(" 99999999999999999999"), Score::Unknown);
    }

    #[test]
    fn tag_forms() {
        assert_eq!(parse_tags("[agents] [rag]"), vec!["agents", "rag"]);
        assert_eq!(parse_tags("[agents], [rag]"), vec!["agents", "rag"]);
        assert_eq!(parse_tags("agents, rag"), vec!["agents", "rag"]);
        assert_eq!(parse_tags("[] [llm]"), vec!["llm"]);
        assert!(parse_tags("   ").is_empty());
    }

    #[test]
    fn title_without_fields_is_dropped() {
        let body = "**Heading noise**\n\n**Real**\n• Relevance Score: 5";
        let table = parse_scores(body);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get_index(0).unwrap().0, "Real");
    }

    #[test]
    fn duplicate_titles_keep_first_position() {
        let body = "**A**\n• Relevance Score: 1\n**B**\n• Relevance Score: 2\n**A**\n• Relevance Score: 3";
        let table = parse_scores(body);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get_index(0).unwrap().1.score, Score::Value(3));
    }

    #[test]
    fn bold_title_requires_whole_line() {
        assert_eq!(bold_title("**Title**"), Some("Title"));
        assert_eq!(bold_title("**Title** trailing"), None);
        assert_eq!(bold_title("****"), None);
    }
}
