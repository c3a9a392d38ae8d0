//! Scripted in-memory ledger double.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use critter_core::{
    AccountId, Balance, CountHandler, CritterError, Dna, FieldValue, KittyField, KittyId,
    LedgerQueries, LedgerSubmit, MultiHandler, PhaseHandler, RecordCount, RequestDescriptor,
    Signer, Subscription, TxPhase,
};

struct MultiSub {
    field: KittyField,
    handler: MultiHandler,
    live: bool,
}

#[derive(Default)]
struct MockState {
    next_id: u64,
    count_subs: HashMap<u64, CountHandler>,
    multi_subs: HashMap<u64, MultiSub>,
    phase_subs: HashMap<u64, PhaseHandler>,
    submissions: Vec<(Signer, RequestDescriptor)>,
    reject_submissions: Option<String>,
    fail_subscriptions: Option<String>,
    deliver_to_cancelled: bool,
}

/// In-memory ledger double with explicit, scripted pushes.
///
/// Every subscription primitive hands back a real [`Subscription`] guard
/// whose cancel closure unregisters the handler and bumps the cancel
/// counter, so tests can assert that N opens were matched by N releases.
///
/// [`deliver_to_cancelled`](Self::deliver_to_cancelled) deliberately keeps
/// invoking handlers whose subscription was already released — simulating a
/// push that was in flight when the cancellation happened — to exercise
/// stale-push defenses in consumers.
pub struct MockLedger {
    state: Arc<Mutex<MockState>>,
    opened: AtomicUsize,
    cancelled: Arc<AtomicUsize>,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLedger {
    /// Create an empty mock with no live subscriptions.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            opened: AtomicUsize::new(0),
            cancelled: Arc::new(AtomicUsize::new(0)),
        }
    }

    // ─── Scripting ───────────────────────────────────────────

    /// Make every later `subscribe_*` call fail with `reason`.
    pub fn fail_subscriptions(&self, reason: &str) {
        self.state.lock().fail_subscriptions = Some(reason.to_owned());
    }

    /// Make every later `submit_signed` call fail with `reason`.
    pub fn reject_submissions(&self, reason: &str) {
        self.state.lock().reject_submissions = Some(reason.to_owned());
    }

    /// Keep delivering field pushes to released subscriptions, simulating
    /// pushes already in flight at cancellation time.
    pub fn deliver_to_cancelled(&self, enabled: bool) {
        self.state.lock().deliver_to_cancelled = enabled;
    }

    /// Push a new scalar count to every live count subscription.
    pub fn push_count(&self, count: RecordCount) {
        let handlers: Vec<CountHandler> = self.state.lock().count_subs.values().cloned().collect();
        for handler in handlers {
            handler(count);
        }
    }

    /// Push a replacement vector to every subscription on `field`.
    pub fn push_field(&self, field: KittyField, values: Vec<Option<FieldValue>>) {
        let handlers: Vec<MultiHandler> = {
            let state = self.state.lock();
            state
                .multi_subs
                .values()
                .filter(|sub| sub.field == field && (sub.live || state.deliver_to_cancelled))
                .map(|sub| sub.handler.clone())
                .collect()
        };
        for handler in handlers {
            handler(values.clone());
        }
    }

    /// Push a DNA replacement vector.
    pub fn push_dnas(&self, values: Vec<Option<Dna>>) {
        self.push_field(
            KittyField::Dna,
            values.into_iter().map(|v| v.map(FieldValue::Dna)).collect(),
        );
    }

    /// Push an owner replacement vector.
    pub fn push_owners(&self, values: Vec<Option<AccountId>>) {
        self.push_field(
            KittyField::Owner,
            values
                .into_iter()
                .map(|v| v.map(FieldValue::Owner))
                .collect(),
        );
    }

    /// Push a price replacement vector.
    pub fn push_prices(&self, values: Vec<Option<Balance>>) {
        self.push_field(
            KittyField::Price,
            values
                .into_iter()
                .map(|v| v.map(FieldValue::Price))
                .collect(),
        );
    }

    /// Report an inclusion phase to every live tracking subscription.
    pub fn emit_phase(&self, phase: TxPhase) {
        let handlers: Vec<PhaseHandler> = self.state.lock().phase_subs.values().cloned().collect();
        for handler in handlers {
            handler(phase.clone());
        }
    }

    /// Report a whole phase sequence, in order.
    pub fn emit_phases(&self, phases: Vec<TxPhase>) {
        for phase in phases {
            self.emit_phase(phase);
        }
    }

    // ─── Accounting ──────────────────────────────────────────

    /// Total subscriptions ever opened (count, multi, and tracking).
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Total subscriptions released so far.
    pub fn cancelled(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Whether every opened subscription has been released exactly once.
    pub fn is_balanced(&self) -> bool {
        self.opened() == self.cancelled()
    }

    /// Number of live multi subscriptions on `field`.
    pub fn live_multi(&self, field: KittyField) -> usize {
        self.state
            .lock()
            .multi_subs
            .values()
            .filter(|sub| sub.field == field && sub.live)
            .count()
    }

    /// Every submission recorded so far, in order.
    pub fn submissions(&self) -> Vec<(Signer, RequestDescriptor)> {
        self.state.lock().submissions.clone()
    }

    fn guard(&self, id: u64, kind: SubKind) -> Subscription {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let state = self.state.clone();
        let cancelled = self.cancelled.clone();
        Subscription::new(move || {
            let mut state = state.lock();
            let removed = match kind {
                SubKind::Count => state.count_subs.remove(&id).is_some(),
                SubKind::Phase => state.phase_subs.remove(&id).is_some(),
                SubKind::Multi => {
                    if state.deliver_to_cancelled {
                        state
                            .multi_subs
                            .get_mut(&id)
                            .map(|sub| sub.live = false)
                            .is_some()
                    } else {
                        state.multi_subs.remove(&id).is_some()
                    }
                }
            };
            if removed {
                cancelled.fetch_add(1, Ordering::SeqCst);
            }
        })
    }

    fn next_id(&self) -> u64 {
        let mut state = self.state.lock();
        state.next_id += 1;
        state.next_id
    }

    fn setup_failure(&self) -> Option<CritterError> {
        self.state
            .lock()
            .fail_subscriptions
            .as_ref()
            .map(|reason| CritterError::subscription(reason.clone()))
    }
}

#[derive(Clone, Copy)]
enum SubKind {
    Count,
    Multi,
    Phase,
}

#[async_trait]
impl LedgerQueries for MockLedger {
    async fn subscribe_count(
        &self,
        on_count: CountHandler,
    ) -> Result<Subscription, CritterError> {
        if let Some(err) = self.setup_failure() {
            return Err(err);
        }
        let id = self.next_id();
        self.state.lock().count_subs.insert(id, on_count);
        Ok(self.guard(id, SubKind::Count))
    }

    async fn subscribe_multi(
        &self,
        field: KittyField,
        _ids: Vec<KittyId>,
        on_values: MultiHandler,
    ) -> Result<Subscription, CritterError> {
        if let Some(err) = self.setup_failure() {
            return Err(err);
        }
        let id = self.next_id();
        self.state.lock().multi_subs.insert(
            id,
            MultiSub {
                field,
                handler: on_values,
                live: true,
            },
        );
        Ok(self.guard(id, SubKind::Multi))
    }
}

#[async_trait]
impl LedgerSubmit for MockLedger {
    async fn submit_signed(
        &self,
        signer: &Signer,
        descriptor: &RequestDescriptor,
        on_phase: PhaseHandler,
    ) -> Result<Subscription, CritterError> {
        if let Some(reason) = self.state.lock().reject_submissions.clone() {
            return Err(CritterError::broadcast(reason));
        }
        let id = self.next_id();
        {
            let mut state = self.state.lock();
            state.submissions.push((signer.clone(), descriptor.clone()));
            state.phase_subs.insert(id, on_phase);
        }
        Ok(self.guard(id, SubKind::Phase))
    }
}
