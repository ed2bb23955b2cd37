//! Publishing a rendered brief to a page store, one batch at a time.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{error, info, instrument};

use briefbuilder_shared::{BlockBatch, BriefBuilderError, Result};

use crate::pipeline::RenderedBrief;

/// A remote document store that accepts a page and then its content batches.
#[async_trait]
pub trait PageSink: Send + Sync {
    /// Create the page (a database row) and return its id.
    async fn create_page(&self, title: &str, date: NaiveDate) -> Result<String>;

    /// Append one batch of blocks as children of the page.
    async fn append_blocks(&self, page_id: &str, batch: &BlockBatch) -> Result<()>;
}

/// Progress callback for reporting publish status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after a batch is accepted.
    fn batch_appended(&self, current: usize, total: usize);
    /// Called when every batch is accepted.
    fn done(&self, report: &PublishReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn batch_appended(&self, _current: usize, _total: usize) {}
    fn done(&self, _report: &PublishReport) {}
}

/// Outcome of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub page_id: String,
    pub batches: usize,
    pub blocks: usize,
}

/// Why a publish stopped. Accepted batches are never resubmitted.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("page creation failed: {source}")]
    PageCreation {
        #[source]
        source: BriefBuilderError,
    },

    #[error("batch {batch_index} failed after {accepted} accepted batch(es) on page {page_id}: {source}")]
    Batch {
        batch_index: usize,
        accepted: usize,
        page_id: String,
        #[source]
        source: BriefBuilderError,
    },
}

impl PublishError {
    /// Index of the failing batch, if the page itself was created.
    pub fn batch_index(&self) -> Option<usize> {
        match self {
            Self::PageCreation { .. } => None,
            Self::Batch { batch_index, .. } => Some(*batch_index),
        }
    }

    /// Batches the sink accepted before the failure.
    pub fn accepted(&self) -> usize {
        match self {
            Self::PageCreation { .. } => 0,
            Self::Batch { accepted, .. } => *accepted,
        }
    }
}

/// Create the page, then append every batch in order.
///
/// Strictly sequential; the first failure stops the run with no retry.
#[instrument(skip_all, fields(title = %brief.title, batches = brief.batches.len()))]
pub async fn publish(
    sink: &dyn PageSink,
    brief: &RenderedBrief,
    date: NaiveDate,
    progress: &dyn ProgressReporter,
) -> std::result::Result<PublishReport, PublishError> {
    progress.phase("Creating page");
    let page_id = sink
        .create_page(&brief.title, date)
        .await
        .map_err(|source| {
            error!(error = %source, "page creation failed");
            PublishError::PageCreation { source }
        })?;
    info!(%page_id, "page created");

    progress.phase("Appending blocks");
    let total = brief.batches.len();
    for (accepted, batch) in brief.batches.iter().enumerate() {
        if let Err(source) = sink.append_blocks(&page_id, batch).await {
            error!(
                batch = batch.index,
                accepted,
                error = %source,
                "batch rejected, stopping"
            );
            return Err(PublishError::Batch {
                batch_index: batch.index,
                accepted,
                page_id,
                source,
            });
        }
        progress.batch_appended(accepted + 1, total);
    }

    let report = PublishReport {
        page_id,
        batches: total,
        blocks: brief.batches.iter().map(BlockBatch::len).sum(),
    };
    info!(page_id = %report.page_id, blocks = report.blocks, "brief published");
    progress.done(&report);
    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
