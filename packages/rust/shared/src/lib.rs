//! Shared types, error model, and configuration for BriefBuilder.
//!
//! This crate is the foundation depended on by all other BriefBuilder crates.
//! It provides:
//! - [`BriefBuilderError`]: the unified error type
//! - Domain types ([`SignalRecord`], [`ScoreTable`], [`AlignedItem`], [`ContentBlock`], ...)
//! - Configuration ([`AppConfig`], [`SectionMarkers`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, NotionConfig, NotionCredentials, RenderConfig, SectionMarkers, config_dir,
    config_file_path, init_config, load_config, load_config_from, resolve_notion_credentials,
};
pub use error::{BriefBuilderError, Result};
pub use types::{
    ActionDetails, ActionRecord, AlignedItem, BlockBatch, ContentBlock, ItemOrder,
    MAX_BLOCKS_PER_BATCH, Score, ScoreRecord, ScoreTable, SignalRecord, SourceTally, TextRun,
};
