//! Section slicing: cut the brief into the bodies under each header marker.

use tracing::debug;

/// Divider glyph that separates the brief's sections.
pub const DIVIDER: &str = "⸻";

/// Return the text between the first line containing `header_marker` and the
/// next heading of level 2 or deeper (`##`, `###`, `####`, ...) or divider line.
///
/// A missing marker yields an empty string; parsers treat that as zero records.
pub fn extract_section(document: &str, header_marker: &str) -> String {
    if header_marker.is_empty() {
        debug!("empty header marker, no section extracted");
        return String::new();
    }

    let mut lines = document.lines();
    if !lines.by_ref().any(|line| line.contains(header_marker)) {
        debug!(marker = header_marker, "section header not found");
        return String::new();
    }

    let body: Vec<&str> = lines.take_while(|line| !is_section_end(line)).collect();

    body.join("\n").trim().to_string()
}

/// A heading line or a divider terminates the current section. Any line
/// starting with `##` counts, so `####` and deeper headings end it too.
fn is_section_end(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("##") || trimmed.starts_with(DIVIDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# Brief\n\n### 📌 Top Signals\n\n1. **A**\n• Source: X\n\n⸻\n\n### 🎯 Relevance\n**A**\n• Relevance Score: 7\n## Next\ntrailing";

    #[test]
    fn stops_at_divider() {
        let body = extract_section(DOC, "📌 Top Signals");
        assert_eq!(body, "1. **A**\n• Source: X");
    }

    #[test]
    fn stops_at_heading() {
        let body = extract_section(DOC, "🎯 Relevance");
        assert_eq!(body, "**A**\n• Relevance Score: 7");
    }

    #[test]
    fn missing_marker_is_empty() {
        assert_eq!(extract_section(DOC, "✅ Actions"), "");
        assert_eq!(extract_section("", "anything"), "");
        assert_eq!(extract_section(DOC, ""), "");
    }

    #[test]
    fn marker_on_last_line_is_empty() {
        assert_eq!(extract_section("intro\n### 📌 Top Signals", "📌 Top Signals"), "");
    }

    #[test]
    fn deeper_headings_also_terminate() {
        let doc = "## Marker\nbody line\n#### deeper\nafter";
        assert_eq!(extract_section(doc, "Marker"), "body line");
    }

    #[test]
    fn runs_to_end_of_document_without_terminator() {
        let doc = "### Marker\nfirst\n\nsecond\n";
        assert_eq!(extract_section(doc, "Marker"), "first\n\nsecond");
    }
}
