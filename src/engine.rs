use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::aggregate::ColumnAggregator;
use crate::dom::{Document, TableId};
use crate::render::FooterRenderer;

/// Debounce window for per-table recomputation.
pub const DEFAULT_RECOMPUTE_DELAY_MS: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    Recompute(TableId),
    Rescan,
}

#[derive(Debug)]
struct Timer {
    deadline: u64,
    action: TimerAction,
}

/// Virtual-clock timer service for the cooperative runtime.
///
/// All work runs as short synchronous passes triggered by timer expiry;
/// suspension only ever happens between callbacks. The clock is a plain
/// millisecond counter, which keeps debounce behavior deterministic under
/// test. Cancelling a timer that already fired is a no-op.
#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    timers: BTreeMap<u64, Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now_ms
    }

    pub fn set_timer(&mut self, delay_ms: u64, action: TimerAction) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(
            id.0,
            Timer {
                deadline: self.now_ms + delay_ms,
                action,
            },
        );
        id
    }

    pub fn cancel(&mut self, id: TimerId) {
        self.timers.remove(&id.0);
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.values().map(|t| t.deadline).min()
    }

    pub fn is_idle(&self) -> bool {
        self.timers.is_empty()
    }

    /// Advance the clock, returning the actions of every timer that came
    /// due, in deadline order.
    pub fn advance(&mut self, ms: u64) -> Vec<TimerAction> {
        self.now_ms += ms;
        let now = self.now_ms;

        let mut due: Vec<(u64, u64, TimerAction)> = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline <= now)
            .map(|(id, t)| (t.deadline, *id, t.action))
            .collect();
        due.sort_by_key(|(deadline, id, _)| (*deadline, *id));

        for (_, id, _) in &due {
            self.timers.remove(id);
        }
        due.into_iter().map(|(_, _, action)| action).collect()
    }
}

#[derive(Debug, Default)]
struct Subscription {
    pending: Option<TimerId>,
}

/// Per-table recomputation state machine.
///
/// A table is either unobserved or observing; observation is terminal
/// while the table stays in the document. The subscription map is keyed by
/// table identity and non-owning: entries for removed tables become inert
/// garbage rather than being torn down.
pub struct RecomputeEngine {
    aggregator: ColumnAggregator,
    renderer: FooterRenderer,
    subscriptions: HashMap<TableId, Subscription>,
    recompute_delay_ms: u64,
    passes: u64,
}

impl RecomputeEngine {
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_RECOMPUTE_DELAY_MS)
    }

    pub fn with_delay(recompute_delay_ms: u64) -> Self {
        Self {
            aggregator: ColumnAggregator::new(),
            renderer: FooterRenderer::new(),
            subscriptions: HashMap::new(),
            recompute_delay_ms,
            passes: 0,
        }
    }

    pub fn is_observing(&self, id: TableId) -> bool {
        self.subscriptions.contains_key(&id)
    }

    /// Total computation passes run so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Register a newly discovered table.
    ///
    /// First discovery runs one synchronous pass and subscribes;
    /// re-discovery of an observing table is a no-op.
    pub fn observe(&mut self, doc: &mut Document, id: TableId) {
        if self.subscriptions.contains_key(&id) {
            return;
        }
        self.run_pass(doc, id);
        self.subscriptions.insert(id, Subscription::default());
        debug!(table = id.index(), "observing table");
    }

    /// A mutation was reported inside an observed table's subtree.
    ///
    /// Cancels any pending debounce timer and arms a fresh one, so a burst
    /// of N mutations collapses into a single recomputation after the
    /// burst settles. Last writer wins; there is no other coalescing.
    pub fn notify_mutation(&mut self, scheduler: &mut Scheduler, id: TableId) {
        if let Some(sub) = self.subscriptions.get_mut(&id) {
            if let Some(timer) = sub.pending.take() {
                scheduler.cancel(timer);
            }
            sub.pending = Some(scheduler.set_timer(self.recompute_delay_ms, TimerAction::Recompute(id)));
        }
    }

    /// The debounce timer for a table expired without being re-cancelled.
    pub fn on_timer(&mut self, doc: &mut Document, id: TableId) {
        if let Some(sub) = self.subscriptions.get_mut(&id) {
            sub.pending = None;
        }
        self.run_pass(doc, id);
    }

    fn run_pass(&mut self, doc: &mut Document, id: TableId) {
        // A stale id means the table left the document; its subscription
        // stays behind as inert garbage.
        let Some(table) = doc.table(id) else {
            return;
        };
        let sums = self.aggregator.column_sums(table);
        self.renderer.render(doc, id, &sums);
        self.passes += 1;
        debug!(table = id.index(), columns = sums.len(), "recompute pass");
    }
}

impl Default for RecomputeEngine {
    fn default() -> Self {
        Self::new()
    }
}
