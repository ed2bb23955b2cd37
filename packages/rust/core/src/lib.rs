//! Core rendering and publishing logic for BriefBuilder.
//!
//! This crate ties the section parsers to alignment, formatting, block
//! building, and batching, and defines the [`publish::PageSink`] port that
//! remote page stores implement.

pub mod align;
pub mod blocks;
pub mod format;
pub mod pipeline;
pub mod publish;

pub use align::{AlignmentStrategy, PositionalAlignment};
pub use blocks::{build_blocks, chunk_blocks, title_block};
pub use format::{FormattedGroup, format_items, format_tags, to_text};
pub use pipeline::{RenderOptions, RenderedBrief, brief_title, render_brief, render_brief_with};
pub use publish::{PageSink, ProgressReporter, PublishError, PublishReport, SilentProgress, publish};
