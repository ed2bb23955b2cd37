//! Core domain types for BriefBuilder: parsed records, aligned items, and
//! the content blocks handed to the page API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BriefBuilderError;

/// Per-request block ceiling of the page API.
pub const MAX_BLOCKS_PER_BATCH: usize = 100;

// ---------------------------------------------------------------------------
// Parsed records
// ---------------------------------------------------------------------------

/// One ranked item from the signals section. Anchors alignment.
///
/// Unset fields are empty strings, never missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub title: String,
    pub source: String,
    /// The "Why it matters" line.
    pub rationale: String,
    /// Copied byte-exact from the brief.
    pub link: String,
}

/// A relevance score: a parsed integer or the `Unknown` sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Score {
    Value(u32),
    #[default]
    Unknown,
}

impl Score {
    /// Numeric value used for ordering; `Unknown` sorts as 0.
    pub fn rank(&self) -> u32 {
        match self {
            Self::Value(n) => *n,
            Self::Unknown => 0,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(n) => write!(f, "{n}"),
            Self::Unknown => f.write_str("N/A"),
        }
    }
}

/// One entry of the relevance section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: Score,
    /// Tags in the order they were written, brackets removed.
    pub tags: Vec<String>,
    pub explanation: String,
    /// "Time to first working version", when the scorer gave one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_estimate: Option<String>,
}

/// Insertion-ordered map of relevance entries keyed by their section-local title.
///
/// Keys are regenerated text and do not reliably match signal titles, so
/// consumers read entries by position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    entries: Vec<(String, ScoreRecord)>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, title: impl Into<String>, record: ScoreRecord) {
        let title = title.into();
        match self.entries.iter_mut().find(|(k, _)| *k == title) {
            Some((_, existing)) => *existing = record,
            None => self.entries.push((title, record)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at insertion position `index`.
    pub fn get_index(&self, index: usize) -> Option<(&str, &ScoreRecord)> {
        self.entries.get(index).map(|(k, v)| (k.as_str(), v))
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &ScoreRecord> {
        self.entries.iter().map(|(_, v)| v)
    }
}

/// One suggested action: the raw lines from its start glyph up to the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub lines: Vec<String>,
}

impl ActionRecord {
    /// The raw block as it appeared in the brief (non-empty lines only).
    pub fn raw(&self) -> String {
        self.lines.join("\n")
    }
}

/// Typed view of an [`ActionRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDetails {
    /// Leading status glyph of the action line (e.g. `✅`).
    pub status: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_estimate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Counts from the "Update Sources" section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTally {
    pub newsletters: Option<u32>,
    pub hacker_news: Option<u32>,
    pub github_repos: Option<u32>,
}

impl SourceTally {
    pub fn is_empty(&self) -> bool {
        self.newsletters.is_none() && self.hacker_news.is_none() && self.github_repos.is_none()
    }
}

// ---------------------------------------------------------------------------
// Aligned items
// ---------------------------------------------------------------------------

/// A signal merged with whatever score and action sat at the same position.
///
/// `None` is the sentinel for "alignment found nothing".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedItem {
    pub signal: SignalRecord,
    pub score: Option<ScoreRecord>,
    pub action: Option<ActionRecord>,
}

impl AlignedItem {
    /// Score used for ordering; a missing record or `Unknown` counts as 0.
    pub fn rank(&self) -> u32 {
        self.score.as_ref().map_or(0, |s| s.score.rank())
    }
}

/// How formatted items are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemOrder {
    /// Keep the order of the signals section.
    Input,
    /// Highest relevance score first; ties keep input order.
    #[serde(alias = "score")]
    ScoreDescending,
}

impl FromStr for ItemOrder {
    type Err = BriefBuilderError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "input" => Ok(Self::Input),
            "score" | "score-descending" => Ok(Self::ScoreDescending),
            other => Err(BriefBuilderError::parse(format!(
                "unknown item order '{other}': expected 'input' or 'score'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Content blocks
// ---------------------------------------------------------------------------

/// A span of text inside a block. Only a run with `link` set is clickable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
}

impl TextRun {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            link: None,
            bold: false,
        }
    }

    pub fn bold(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            link: None,
            bold: true,
        }
    }

    pub fn linked(content: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            link: Some(url.into()),
            bold: false,
        }
    }
}

/// One typed renderable unit of the destination page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentBlock {
    Heading { level: u8, runs: Vec<TextRun> },
    Paragraph { runs: Vec<TextRun> },
    BulletedItem { runs: Vec<TextRun> },
    Divider,
}

impl ContentBlock {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::Heading {
            level,
            runs: vec![TextRun::plain(text)],
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph {
            runs: vec![TextRun::plain(text)],
        }
    }

    /// Block kind name as used in logs and tests.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Heading { .. } => "heading",
            Self::Paragraph { .. } => "paragraph",
            Self::BulletedItem { .. } => "bulleted_item",
            Self::Divider => "divider",
        }
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        match self {
            Self::Heading { runs, .. } | Self::Paragraph { runs } | Self::BulletedItem { runs } => {
                runs.iter().map(|r| r.content.as_str()).collect()
            }
            Self::Divider => String::new(),
        }
    }

    pub fn is_divider(&self) -> bool {
        matches!(self, Self::Divider)
    }
}

/// A contiguous, order-preserving slice of blocks sized for one API request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockBatch {
    /// Zero-based position of this batch in the submission sequence.
    pub index: usize,
    pub blocks: Vec<ContentBlock>,
}

impl BlockBatch {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_display_and_rank() {
        assert_eq!(Score::Value(8).to_string(), "8");
        assert_eq!(Score::Unknown.to_string(), "N/A");
        assert_eq!(Score::Unknown.rank(), 0);
        assert_eq!(Score::Value(7).rank(), 7);
    }

    #[test]
    fn score_table_keeps_first_position_on_reinsert() {
        let mut table = ScoreTable::new();
        table.insert("a", ScoreRecord::default());
        table.insert("b", ScoreRecord::default());
        table.insert(
            "a",
            ScoreRecord {
                score: Score::Value(9),
                ..Default::default()
            },
        );

        assert_eq!(table.len(), 2);
        let titles: Vec<&str> = table.titles().collect();
        assert_eq!(titles, vec!["a", "b"]);
        assert_eq!(table.get_index(0).unwrap().1.score, Score::Value(9));
    }

    #[test]
    fn item_order_parses() {
        assert_eq!("input".parse::<ItemOrder>().unwrap(), ItemOrder::Input);
        assert_eq!("score".parse::<ItemOrder>().unwrap(), ItemOrder::ScoreDescending);
        let err = "sideways".parse::<ItemOrder>().unwrap_err();
        assert!(err.to_string().contains("sideways"));
    }

    #[test]
    fn content_block_serialization() {
        let block = ContentBlock::BulletedItem {
            runs: vec![
                TextRun::plain("• "),
                TextRun::linked("🔗 Read more", "https://example.com/a?b=c"),
            ],
        };
        let json = serde_json::to_string(&block).expect("serialize");
        assert!(json.contains("\"kind\":\"bulleted_item\""));
        assert!(json.contains("https://example.com/a?b=c"));

        let parsed: ContentBlock = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, block);
        assert_eq!(parsed.text(), "• 🔗 Read more");
    }

    #[test]
    fn divider_has_no_text() {
        assert!(ContentBlock::Divider.is_divider());
        assert_eq!(ContentBlock::Divider.text(), "");
        assert_eq!(ContentBlock::Divider.kind(), "divider");
    }
}
