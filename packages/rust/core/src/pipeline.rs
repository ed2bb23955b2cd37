//! End-to-end render pipeline: brief text → parse → align → format → blocks → batches.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, instrument};

use briefbuilder_parser::parse_brief;
use briefbuilder_shared::{
    AlignedItem, AppConfig, BlockBatch, BriefBuilderError, ContentBlock, ItemOrder,
    MAX_BLOCKS_PER_BATCH, Result, SectionMarkers, SourceTally,
};

use crate::align::{AlignmentStrategy, PositionalAlignment};
use crate::blocks::{build_blocks, chunk_blocks, title_block};
use crate::format::{FormattedGroup, format_items};

/// Options for one render.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Header substrings locating each section.
    pub sections: SectionMarkers,
    /// Item ordering. Always explicit.
    pub order: ItemOrder,
    /// Text of the synthesized level-1 heading.
    pub title: String,
    /// Blocks per batch, at most [`MAX_BLOCKS_PER_BATCH`].
    pub max_batch_size: usize,
}

impl RenderOptions {
    /// Options with default section markers and the full batch size.
    pub fn new(order: ItemOrder, title: impl Into<String>) -> Self {
        Self {
            sections: SectionMarkers::default(),
            order,
            title: title.into(),
            max_batch_size: MAX_BLOCKS_PER_BATCH,
        }
    }

    /// Build options from loaded config, a resolved order, and the brief date.
    pub fn from_config(config: &AppConfig, order: ItemOrder, date: NaiveDate) -> Self {
        Self {
            sections: config.sections.clone(),
            order,
            title: brief_title(&config.render.title_prefix, date),
            max_batch_size: config.render.max_batch_size,
        }
    }
}

/// `"<prefix> - <YYYY-MM-DD>"`.
pub fn brief_title(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix} - {}", date.format("%Y-%m-%d"))
}

/// Everything produced from one brief.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedBrief {
    pub title: String,
    pub items: Vec<AlignedItem>,
    pub groups: Vec<FormattedGroup>,
    pub tally: SourceTally,
    /// Full block sequence, title heading first.
    pub blocks: Vec<ContentBlock>,
    pub batches: Vec<BlockBatch>,
}

impl RenderedBrief {
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

/// Render a brief with positional alignment.
pub fn render_brief(document: &str, options: &RenderOptions) -> Result<RenderedBrief> {
    render_brief_with(document, options, &PositionalAlignment)
}

/// Render a brief with a caller-chosen alignment strategy.
///
/// Deterministic: the same document and options always yield the same blocks.
#[instrument(
    skip_all,
    fields(doc_len = document.len(), order = ?options.order, strategy = strategy.name())
)]
pub fn render_brief_with(
    document: &str,
    options: &RenderOptions,
    strategy: &dyn AlignmentStrategy,
) -> Result<RenderedBrief> {
    if document.trim().is_empty() {
        return Err(BriefBuilderError::validation("brief document is empty"));
    }
    if options.max_batch_size == 0 || options.max_batch_size > MAX_BLOCKS_PER_BATCH {
        return Err(BriefBuilderError::validation(format!(
            "batch size must be between 1 and {MAX_BLOCKS_PER_BATCH}, got {}",
            options.max_batch_size
        )));
    }

    let parsed = parse_brief(document, &options.sections);
    let items = strategy.align(&parsed.signals, &parsed.scores, &parsed.actions);
    let groups = format_items(&items, options.order);

    let mut blocks = vec![title_block(&options.title)];
    for group in &groups {
        blocks.extend(build_blocks(&group.lines));
    }
    let batches = chunk_blocks(blocks.clone(), options.max_batch_size);

    info!(
        items = items.len(),
        blocks = blocks.len(),
        batches = batches.len(),
        newsletters = ?parsed.tally.newsletters,
        hacker_news = ?parsed.tally.hacker_news,
        github_repos = ?parsed.tally.github_repos,
        "brief rendered"
    );

    Ok(RenderedBrief {
        title: options.title.clone(),
        items,
        groups,
        tally: parsed.tally,
        blocks,
        batches,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
