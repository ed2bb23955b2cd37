//! Content blocks → Notion block JSON.

use serde_json::{Map, Value, json};

use briefbuilder_shared::{ContentBlock, TextRun};

/// Notion rejects rich text objects longer than this.
pub const MAX_TEXT_CHARS: usize = 2000;

/// Encode one block as a Notion block object.
pub fn encode_block(block: &ContentBlock) -> Value {
    match block {
        ContentBlock::Heading { level, runs } => {
            let kind = match level {
                0 | 1 => "heading_1",
                2 => "heading_2",
                _ => "heading_3",
            };
            typed_block(kind, runs)
        }
        ContentBlock::Paragraph { runs } => typed_block("paragraph", runs),
        ContentBlock::BulletedItem { runs } => typed_block("bulleted_list_item", runs),
        ContentBlock::Divider => json!({
            "object": "block",
            "type": "divider",
            "divider": {},
        }),
    }
}

/// Encode a batch as the `children` array of an append request.
pub fn encode_children(blocks: &[ContentBlock]) -> Value {
    Value::Array(blocks.iter().map(encode_block).collect())
}

fn typed_block(kind: &str, runs: &[TextRun]) -> Value {
    let mut block = Map::new();
    block.insert("object".into(), json!("block"));
    block.insert("type".into(), json!(kind));
    block.insert(kind.into(), json!({ "rich_text": encode_runs(runs) }));
    Value::Object(block)
}

/// Encode runs as rich text, splitting any run over [`MAX_TEXT_CHARS`].
pub fn encode_runs(runs: &[TextRun]) -> Vec<Value> {
    runs.iter()
        .flat_map(|run| {
            split_chars(&run.content, MAX_TEXT_CHARS)
                .into_iter()
                .map(move |piece| encode_text(piece, run))
        })
        .collect()
}

fn encode_text(content: &str, run: &TextRun) -> Value {
    let mut text = Map::new();
    text.insert("content".into(), json!(content));
    if let Some(url) = &run.link {
        text.insert("link".into(), json!({ "url": url }));
    }

    let mut rich = Map::new();
    rich.insert("type".into(), json!("text"));
    rich.insert("text".into(), Value::Object(text));
    if run.bold {
        rich.insert("annotations".into(), json!({ "bold": true }));
    }
    Value::Object(rich)
}

/// Split on char boundaries into pieces of at most `max` chars.
fn split_chars(text: &str, max: usize) -> Vec<&str> {
    if text.chars().count() <= max {
        return vec![text];
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (offset, _) in text.char_indices() {
        if count == max {
            pieces.push(&text[start..offset]);
            start = offset;
            count = 0;
        }
        count += 1;
    }
    pieces.push(&text[start..]);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_levels() {
        assert_eq!(encode_block(&ContentBlock::heading(1, "T"))["type"], "heading_1");
        assert_eq!(encode_block(&ContentBlock::heading(2, "T"))["type"], "heading_2");
        assert_eq!(encode_block(&ContentBlock::heading(5, "T"))["type"], "heading_3");
    }

    #[test]
    fn divider_has_empty_body() {
        let value = encode_block(&ContentBlock::Divider);
        assert_eq!(value, json!({"object": "block", "type": "divider", "divider": {}}));
    }

    #[test]
    fn link_only_on_its_run() {
        let block = ContentBlock::BulletedItem {
            runs: vec![
                TextRun::plain("• "),
                TextRun::linked("🔗 Read more", "https://e.com/?a=1&b=2"),
            ],
        };
        let value = encode_block(&block);
        let rich = value["bulleted_list_item"]["rich_text"].as_array().unwrap();

        assert_eq!(rich.len(), 2);
        assert!(rich[0]["text"].get("link").is_none());
        assert_eq!(rich[1]["text"]["link"]["url"], "https://e.com/?a=1&b=2");
        assert_eq!(rich[1]["text"]["content"], "🔗 Read more");
    }

    #[test]
    fn bold_runs_are_annotated() {
        let block = ContentBlock::Paragraph {
            runs: vec![TextRun::bold("📍 Source:"), TextRun::plain(" Blog")],
        };
        let value = encode_block(&block);
        let rich = value["paragraph"]["rich_text"].as_array().unwrap();
        assert_eq!(rich[0]["annotations"]["bold"], true);
        assert!(rich[1].get("annotations").is_none());
    }

    #[test]
    fn long_runs_are_split() {
        let long = "é".repeat(MAX_TEXT_CHARS * 2 + 5);
        let runs = encode_runs(&[TextRun::plain(long)]);
        assert_eq!(runs.len(), 3);
        assert_eq!(
            runs[2]["text"]["content"].as_str().unwrap().chars().count(),
            5
        );
    }

    #[test]
    fn children_keep_order() {
        let blocks = vec![
            ContentBlock::heading(1, "A"),
            ContentBlock::Divider,
            ContentBlock::paragraph("B"),
        ];
        let children = encode_children(&blocks);
        let kinds: Vec<&str> = children
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["type"].as_str().unwrap())
            .collect();
        assert_eq!(kinds, vec!["heading_1", "divider", "paragraph"]);
    }
}
