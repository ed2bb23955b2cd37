//! Signals section parser.
//!
//! Format (one record per numbered entry):
//! ```text
//! 1. **Title**
//!    • Source: source name
//!    • Why it matters: one line
//!    • Link: [text](url)   or   url
//! ```

use std::sync::LazyLock;

use regex::Regex;

use briefbuilder_shared::SignalRecord;

/// Matches `1. **Title**` and captures the title.
static ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\s*\*\*(.+?)\*\*").expect("signal entry regex")
});

/// Matches an inline link anywhere in the text and captures its url.
static INLINE_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[.*?\]\((.*?)\)").expect("inline link regex")
});

const SOURCE_PREFIX: &str = "• Source:";
const RATIONALE_PREFIX: &str = "• Why it matters:";
const LINK_PREFIX: &str = "• Link:";

/// Parse the signals section body into records, in document order.
pub fn parse_signals(body: &str) -> Vec<SignalRecord> {
    let mut records = Vec::new();
    let mut current: Option<SignalRecord> = None;

    for line in body.lines() {
        let line = line.trim();

        if let Some(caps) = ENTRY_RE.captures(line) {
            if let Some(record) = current.take() {
                records.push(record);
            }
            current = Some(SignalRecord {
                title: caps[1].trim().to_string(),
                ..SignalRecord::default()
            });
            continue;
        }

        // Field lines outside a record are stray text
        let Some(record) = current.as_mut() else {
            continue;
        };

        if let Some(rest) = line.strip_prefix(SOURCE_PREFIX) {
            record.source = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix(RATIONALE_PREFIX) {
            record.rationale = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix(LINK_PREFIX) {
            record.link = extract_link(rest);
        }
    }

    if let Some(record) = current.take() {
        records.push(record);
    }

    records
}

/// Take the url out of `[text](url)`, or the trimmed text verbatim otherwise.
pub fn extract_link(text: &str) -> String {
    let text = text.trim();
    match INLINE_LINK_RE.captures(text) {
        Some(caps) => caps[1].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbered_entries_in_order() {
        let body = "1. **First**\n   • Source: A\n2. **Second**\n   • Source: B\n3. **Third**";
        let records = parse_signals(body);

        assert_eq!(records.len(), 3);
        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
        assert_eq!(records[1].source, "B");
    }

    #[test]
    fn populates_all_fields() {
        let body = "1. **Title**\n   • Source: OpenAI Blog\n   • Why it matters: Because.\n   • Link: https://example.com/x";
        let records = parse_signals(body);

        assert_eq!(
            records[0],
            SignalRecord {
                title: "Title".into(),
                source: "OpenAI Blog".into(),
                rationale: "Because.".into(),
                link: "https://example.com/x".into(),
            }
        );
    }

    #[test]
    fn raw_and_inline_links_yield_same_url() {
        let url = "https://example.com/path?q=1&utm_source=brief#frag";
        let raw = parse_signals(&format!("1. **A**\n• Link: {url}"));
        let inline = parse_signals(&format!("1. **A**\n• Link: [Read it]({url})"));

        assert_eq!(raw[0].link, url);
        assert_eq!(inline[0].link, url);
    }

    #[test]
    fn unset_fields_default_to_empty() {
        let records = parse_signals("1. **Only a title**");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source, "");
        assert_eq!(records[0].rationale, "");
        assert_eq!(records[0].link, "");
    }

    #[test]
    fn ignores_fields_before_first_entry() {
        let records = parse_signals("• Source: orphan\n1. **A**\n• Source: real");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source, "real");
    }

    #[test]
    fn empty_body_has_no_records() {
        assert!(parse_signals("").is_empty());
        assert!(parse_signals("just prose\nwith no entries").is_empty());
    }

    #[test]
    fn title_without_space_after_ordinal() {
        let records = parse_signals("12.**Tight**");
        assert_eq!(records[0].title, "Tight");
    }
}
