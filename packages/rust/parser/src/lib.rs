//! Brief parsing: section extraction and the per-section record parsers.
//!
//! Every parser here is a single forward pass over the section's lines with
//! two states (waiting for a record start / accumulating fields), flushing on
//! the next start and at end of input. Nothing is fatal: a missing section is
//! an empty body, which parses to zero records.

mod actions;
mod relevance;
mod sections;
mod signals;
mod tally;

use tracing::{debug, instrument};

use briefbuilder_shared::{ActionRecord, ScoreTable, SectionMarkers, SignalRecord, SourceTally};

pub use actions::{ACTION_START, parse_action_details, parse_actions};
pub use relevance::{parse_score, parse_scores, parse_tags};
pub use sections::{DIVIDER, extract_section};
pub use signals::{extract_link, parse_signals};
pub use tally::parse_source_tally;

/// Records extracted from all sections of one brief.
#[derive(Debug, Clone, Default)]
pub struct ParsedBrief {
    pub signals: Vec<SignalRecord>,
    pub scores: ScoreTable,
    pub actions: Vec<ActionRecord>,
    pub tally: SourceTally,
}

/// Slice the brief by the configured markers and run each section parser.
#[instrument(skip_all, fields(doc_len = document.len()))]
pub fn parse_brief(document: &str, markers: &SectionMarkers) -> ParsedBrief {
    let signals = parse_signals(&extract_section(document, &markers.signals));
    let scores = parse_scores(&extract_section(document, &markers.relevance));
    let actions = parse_actions(&extract_section(document, &markers.actions));
    let tally = parse_source_tally(&extract_section(document, &markers.sources));

    debug!(
        signals = signals.len(),
        scores = scores.len(),
        actions = actions.len(),
        "brief sections parsed"
    );

    ParsedBrief {
        signals,
        scores,
        actions,
        tally,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use briefbuilder_shared::Score;
    use std::fs;

    fn fixture_path(name: &str) -> std::path::PathBuf {
        std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures/briefs")
            .join(name)
    }

    fn load_fixture(name: &str) -> String {
        fs::read_to_string(fixture_path(name))
            .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
    }

    #[test]
    fn full_brief_fixture() {
        let doc = load_fixture("strategy_brief.md");
        let parsed = parse_brief(&doc, &SectionMarkers::default());

        assert_eq!(parsed.signals.len(), 5);
        assert_eq!(parsed.scores.len(), 5);
        assert_eq!(parsed.actions.len(), 2);

        assert_eq!(
            parsed.signals[0].title,
            "OpenAI ships structured outputs for function calling"
        );
        assert_eq!(
            parsed.signals[0].link,
            "https://openai.com/index/introducing-structured-outputs-in-the-api/"
        );
        assert_eq!(
            parsed.signals[1].link,
            "https://blog.langchain.dev/langgraph-checkpoints/?utm_source=brief&ref=a_b"
        );
        assert_eq!(parsed.scores.get_index(0).unwrap().1.score, Score::Value(9));

        assert_eq!(parsed.tally.newsletters, Some(4));
        assert_eq!(parsed.tally.hacker_news, Some(12));
        assert_eq!(parsed.tally.github_repos, Some(7));
    }

    #[test]
    fn partial_brief_fixture() {
        let doc = load_fixture("partial_brief.md");
        let parsed = parse_brief(&doc, &SectionMarkers::default());

        assert_eq!(parsed.signals.len(), 5);
        assert_eq!(parsed.scores.len(), 3);
        assert_eq!(parsed.actions.len(), 1);
        assert_eq!(parsed.scores.get_index(1).unwrap().1.score, Score::Unknown);
        assert_eq!(parsed.signals[3].link, "");
        assert_eq!(parsed.signals[4].rationale, "");
        assert!(parsed.tally.is_empty());
    }

    #[test]
    fn missing_sections_parse_to_nothing() {
        let parsed = parse_brief("# Just a title\n\nSome prose.", &SectionMarkers::default());
        assert!(parsed.signals.is_empty());
        assert!(parsed.scores.is_empty());
        assert!(parsed.actions.is_empty());
    }

    #[test]
    fn custom_markers() {
        let doc = "## Signals\n1. **A**\n• Source: S\n⸻\n## Scores\n**A**\n• Relevance Score: 2";
        let markers = SectionMarkers {
            signals: "Signals".into(),
            relevance: "Scores".into(),
            ..SectionMarkers::default()
        };
        let parsed = parse_brief(doc, &markers);
        assert_eq!(parsed.signals.len(), 1);
        assert_eq!(parsed.scores.len(), 1);
    }
}
