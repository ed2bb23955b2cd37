//! Record alignment: merge the three parsed sections into one item per signal.
//!
//! The sections are written independently upstream, so titles rarely match
//! across them. Alignment is therefore a pluggable strategy; the built-in
//! [`PositionalAlignment`] pairs records by index.

use tracing::{debug, warn};

use briefbuilder_shared::{ActionRecord, AlignedItem, ScoreTable, SignalRecord};

/// Strategy for pairing signals with score and action records.
///
/// Implementations must return exactly one item per signal, in signal order.
pub trait AlignmentStrategy: Send + Sync {
    fn align(
        &self,
        signals: &[SignalRecord],
        scores: &ScoreTable,
        actions: &[ActionRecord],
    ) -> Vec<AlignedItem>;

    /// Human-readable strategy name for tracing.
    fn name(&self) -> &str;
}

/// Pair the i-th signal with the i-th score entry and the i-th action.
///
/// Shorter score/action sequences leave `None` in the trailing items; extra
/// scores or actions beyond the last signal are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalAlignment;

impl AlignmentStrategy for PositionalAlignment {
    fn align(
        &self,
        signals: &[SignalRecord],
        scores: &ScoreTable,
        actions: &[ActionRecord],
    ) -> Vec<AlignedItem> {
        let items: Vec<AlignedItem> = signals
            .iter()
            .enumerate()
            .map(|(i, signal)| {
                let score = scores.get_index(i).map(|(_, record)| record.clone());
                let action = actions.get(i).cloned();

                if score.is_none() {
                    warn!(index = i + 1, title = %signal.title, "no relevance entry for signal");
                }
                if action.is_none() {
                    debug!(index = i + 1, title = %signal.title, "no action for signal");
                }

                AlignedItem {
                    signal: signal.clone(),
                    score,
                    action,
                }
            })
            .collect();

        if scores.len() > signals.len() || actions.len() > signals.len() {
            debug!(
                signals = signals.len(),
                scores = scores.len(),
                actions = actions.len(),
                "extra records beyond the last signal ignored"
            );
        }

        items
    }

    fn name(&self) -> &str {
        "positional"
    }
}
