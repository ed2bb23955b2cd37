//! Block tree builder: formatted lines → typed content blocks → API-sized batches.

use tracing::{debug, instrument};

use briefbuilder_parser::DIVIDER;
use briefbuilder_shared::{BlockBatch, ContentBlock, MAX_BLOCKS_PER_BATCH, TextRun};

use crate::format::{
    ACTION_ICON, NO_ACTION_ICON, RATIONALE_ICON, SCORE_ICON, SOURCE_ICON, TAGS_ICON, TITLE_ICON,
};

/// Leading glyphs of field lines rendered as paragraphs.
const FIELD_ICONS: [&str; 6] = [
    SOURCE_ICON,
    RATIONALE_ICON,
    TAGS_ICON,
    SCORE_ICON,
    ACTION_ICON,
    NO_ACTION_ICON,
];

/// Bullet marker at the start of a list line.
const BULLET_MARK: &str = "•";

/// Classify each non-blank line into one content block.
///
/// Priority: divider, item title heading, field paragraph, bulleted item,
/// plain paragraph.
#[instrument(skip_all, fields(lines = lines.len()))]
pub fn build_blocks<S: AsRef<str>>(lines: &[S]) -> Vec<ContentBlock> {
    let blocks: Vec<ContentBlock> = lines
        .iter()
        .map(|line| line.as_ref().trim())
        .filter(|line| !line.is_empty())
        .map(classify_line)
        .collect();

    debug!(blocks = blocks.len(), "lines classified");
    blocks
}

fn classify_line(line: &str) -> ContentBlock {
    if line == DIVIDER {
        return ContentBlock::Divider;
    }

    if let Some(title) = item_title(line) {
        return ContentBlock::heading(2, format!("{TITLE_ICON} {title}"));
    }

    if FIELD_ICONS.iter().any(|icon| line.starts_with(icon)) {
        return ContentBlock::Paragraph {
            runs: field_runs(line),
        };
    }

    if line.starts_with(BULLET_MARK) {
        return ContentBlock::BulletedItem {
            runs: bullet_runs(line),
        };
    }

    ContentBlock::paragraph(line)
}

/// `🔹 **Title**` → `Title`.
fn item_title(line: &str) -> Option<&str> {
    line.strip_prefix(TITLE_ICON)?
        .trim_start()
        .strip_prefix("**")?
        .strip_suffix("**")
}

/// Bold the `icon Label:` part of a field line; the value stays plain.
fn field_runs(line: &str) -> Vec<TextRun> {
    match line.split_once(':') {
        Some((label, value)) => {
            let mut runs = vec![TextRun::bold(format!("{label}:"))];
            if !value.is_empty() {
                runs.push(TextRun::plain(value));
            }
            runs
        }
        None => vec![TextRun::plain(line)],
    }
}

/// Split a bullet line around its first inline link so only the link text
/// carries the url.
fn bullet_runs(line: &str) -> Vec<TextRun> {
    let Some(link) = split_inline_link(line) else {
        return vec![TextRun::plain(line)];
    };

    let mut runs = Vec::with_capacity(3);
    if !link.before.is_empty() {
        runs.push(TextRun::plain(link.before));
    }
    runs.push(TextRun::linked(link.text.trim(), link.url));
    if !link.after.is_empty() {
        runs.push(TextRun::plain(link.after));
    }
    runs
}

struct InlineLink<'a> {
    before: &'a str,
    text: &'a str,
    url: &'a str,
    after: &'a str,
}

/// Locate `[text](url)`. The url ends at the `)` matching the link's `(`, so
/// balanced parentheses inside the url survive and trailing text does not leak in.
fn split_inline_link(line: &str) -> Option<InlineLink<'_>> {
    let open = line.find('[')?;
    let mid = open + line[open..].find("](")?;
    let tail = &line[mid + 2..];
    let close = matching_paren(tail)?;

    Some(InlineLink {
        before: &line[..open],
        text: &line[open + 1..mid],
        url: &tail[..close],
        after: &tail[close + 1..],
    })
}

/// Byte offset of the `)` closing an already-opened `(`.
fn matching_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(offset),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// The synthesized document heading placed before every other block.
pub fn title_block(title: &str) -> ContentBlock {
    ContentBlock::heading(1, title)
}

/// Split blocks into consecutive batches of at most `max_size` blocks.
///
/// `max_size` is held within `1..=MAX_BLOCKS_PER_BATCH`.
pub fn chunk_blocks(blocks: Vec<ContentBlock>, max_size: usize) -> Vec<BlockBatch> {
    let size = max_size.clamp(1, MAX_BLOCKS_PER_BATCH);

    blocks
        .chunks(size)
        .enumerate()
        .map(|(index, chunk)| BlockBatch {
            index,
            blocks: chunk.to_vec(),
        })
        .collect()
}
