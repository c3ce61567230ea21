use tracing::debug;

use crate::dom::Document;
use crate::engine::{RecomputeEngine, Scheduler, TimerAction, TimerId};

/// Debounce window for page-wide rescans.
pub const DEFAULT_RESCAN_DELAY_MS: u64 = 400;

/// Page-wide sweep that feeds candidate tables to the engine.
///
/// Runs once at startup and re-arms itself on a longer debounce window
/// whenever the document root's child structure changes, so tables
/// inserted after initial load get picked up. Re-entrancy is bounded by
/// the same debounce-plus-idempotent-registration guarantees the engine
/// gives: rescanning an already-observed table is a no-op.
pub struct DiscoveryLoop {
    pending: Option<TimerId>,
    rescan_delay_ms: u64,
}

impl DiscoveryLoop {
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_RESCAN_DELAY_MS)
    }

    pub fn with_delay(rescan_delay_ms: u64) -> Self {
        Self {
            pending: None,
            rescan_delay_ms,
        }
    }

    /// Sweep the document and register every table with the engine.
    pub fn scan(&self, doc: &mut Document, engine: &mut RecomputeEngine) {
        let ids = doc.table_ids();
        debug!(tables = ids.len(), "discovery sweep");
        for id in ids {
            engine.observe(doc, id);
        }
    }

    /// A child-list change happened somewhere under the document root.
    pub fn notify_mutation(&mut self, scheduler: &mut Scheduler) {
        if let Some(timer) = self.pending.take() {
            scheduler.cancel(timer);
        }
        self.pending = Some(scheduler.set_timer(self.rescan_delay_ms, TimerAction::Rescan));
    }

    /// The rescan timer expired without being re-cancelled.
    pub fn on_timer(&mut self, doc: &mut Document, engine: &mut RecomputeEngine) {
        self.pending = None;
        self.scan(doc, engine);
    }
}

impl Default for DiscoveryLoop {
    fn default() -> Self {
        Self::new()
    }
}
