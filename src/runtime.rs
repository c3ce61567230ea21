use tracing::warn;

use crate::discover::DiscoveryLoop;
use crate::dom::{Document, MutationKind, MutationTarget};
use crate::engine::{RecomputeEngine, Scheduler, TimerAction};

/// Settle-cycle bound. A healthy page converges within one extra cycle
/// after every pass; hitting this bound means the output is oscillating.
const MAX_SETTLE_CYCLES: u32 = 64;

/// Single-threaded cooperative event loop tying the pieces together.
///
/// Mirrors how the pieces run in a page: short synchronous passes driven
/// by change notifications and debounce timers, nothing in flight between
/// callbacks. Mutation routing follows the observation setup: table
/// observers see child-list and character-data changes inside their table,
/// the discovery loop sees child-list changes anywhere under the root.
pub struct Runtime {
    doc: Document,
    engine: RecomputeEngine,
    discovery: DiscoveryLoop,
    scheduler: Scheduler,
}

impl Runtime {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            engine: RecomputeEngine::new(),
            discovery: DiscoveryLoop::new(),
            scheduler: Scheduler::new(),
        }
    }

    pub fn with_delays(doc: Document, recompute_delay_ms: u64, rescan_delay_ms: u64) -> Self {
        Self {
            doc,
            engine: RecomputeEngine::with_delay(recompute_delay_ms),
            discovery: DiscoveryLoop::with_delay(rescan_delay_ms),
            scheduler: Scheduler::new(),
        }
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn engine(&self) -> &RecomputeEngine {
        &self.engine
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Initial sweep: discover and compute every table already present.
    pub fn start(&mut self) {
        self.discovery.scan(&mut self.doc, &mut self.engine);
        self.dispatch_mutations();
    }

    /// Advance the virtual clock, firing due timers and routing whatever
    /// mutations their passes caused.
    pub fn advance_ms(&mut self, ms: u64) {
        self.dispatch_mutations();
        for action in self.scheduler.advance(ms) {
            self.run_action(action);
        }
        self.dispatch_mutations();
    }

    /// Pump the loop until no timer is pending and no mutation is queued.
    ///
    /// Returns the number of cycles it took. Convergence is an invariant,
    /// not an accident of timing: identical sums re-render to identical
    /// footers, which the document swallows silently, so each table costs
    /// at most one settle cycle beyond its computation pass.
    pub fn settle(&mut self) -> u32 {
        self.dispatch_mutations();
        let mut cycles = 0;
        while let Some(deadline) = self.scheduler.next_deadline() {
            if cycles >= MAX_SETTLE_CYCLES {
                warn!(cycles, "runtime failed to settle; output is oscillating");
                break;
            }
            let step = deadline.saturating_sub(self.scheduler.now());
            self.advance_ms(step);
            cycles += 1;
        }
        cycles
    }

    pub fn is_settled(&self) -> bool {
        self.scheduler.is_idle() && !self.doc.has_pending_mutations()
    }

    fn run_action(&mut self, action: TimerAction) {
        match action {
            TimerAction::Recompute(id) => self.engine.on_timer(&mut self.doc, id),
            TimerAction::Rescan => self.discovery.on_timer(&mut self.doc, &mut self.engine),
        }
    }

    fn dispatch_mutations(&mut self) {
        for mutation in self.doc.take_mutations() {
            if mutation.kind == MutationKind::ChildList {
                self.discovery.notify_mutation(&mut self.scheduler);
            }
            if let MutationTarget::Table(id) = mutation.target {
                self.engine.notify_mutation(&mut self.scheduler, id);
            }
        }
    }
}
