//! Synchronizer controller: the glue state machine.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use critter_core::{
    id_range, AccountId, Balance, Dna, FieldValue, KittyField, KittyId, KittyView, LedgerClient,
    RecordCount, RequestDescriptor, Signer, Subscription,
};

use crate::count::CountWatcher;
use crate::fields::{FieldPush, FieldSink, FieldSubscriptionSet};
use crate::lifecycle::{RequestLifecycle, StatusSink, SubmitHandle};
use crate::merge::merge_views;

/// Lifecycle state of the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// Not yet started.
    Idle,
    /// Count subscription open, waiting for the first non-zero count.
    Counting,
    /// Field subscriptions live; views are being merged and published.
    Syncing,
}

/// Events consumed by the controller's single event-loop task.
///
/// Ledger callbacks only ever send into this channel; all snapshot state is
/// owned by the loop and replaced wholesale, so there is exactly one writer
/// and no locking.
enum SyncEvent {
    Count(RecordCount),
    Fields(FieldPush),
    Status(String),
    Shutdown,
}

/// Orchestrates count watching, field fan-out, merging, and submissions.
///
/// `spawn` opens the count subscription (entering `Counting`) and starts the
/// event loop. The first count push > 0 builds the id list `0..count`,
/// opens the field subscriptions, and enters `Syncing`; every later push
/// that changes the count rebuilds the list and resubscribes (the previous
/// generation is always released first). Equal count pushes are no-ops.
/// Every accepted field push re-merges and publishes the view sequence.
///
/// Teardown — explicit [`shutdown`](Self::shutdown) or dropping the
/// controller — releases the count subscription and every field
/// subscription; no subscription outlives the controller.
pub struct SyncController {
    events: mpsc::UnboundedSender<SyncEvent>,
    ledger: Arc<dyn LedgerClient>,
    views: watch::Receiver<Vec<KittyView>>,
    count: watch::Receiver<RecordCount>,
    status: watch::Receiver<String>,
    phase: watch::Receiver<SyncPhase>,
}

impl SyncController {
    /// Start synchronizing for `viewer`. The count subscription is opened
    /// before this returns; a setup failure is non-fatal and lands in the
    /// status slot (the view stays empty).
    pub async fn spawn(ledger: Arc<dyn LedgerClient>, viewer: AccountId) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (views_tx, views_rx) = watch::channel(Vec::new());
        let (count_tx, count_rx) = watch::channel(0);
        let (status_tx, status_rx) = watch::channel(String::new());
        let (phase_tx, phase_rx) = watch::channel(SyncPhase::Idle);

        let field_sink: FieldSink = {
            let events = events_tx.clone();
            Arc::new(move |push| {
                let _ = events.send(SyncEvent::Fields(push));
            })
        };

        let mut driver = Driver {
            viewer,
            events_rx,
            views_tx,
            count_tx,
            status_tx,
            phase_tx,
            fields: FieldSubscriptionSet::new(ledger.clone(), field_sink),
            dnas: HashMap::new(),
            owners: HashMap::new(),
            prices: HashMap::new(),
            ids: Vec::new(),
            count: 0,
            count_sub: None,
            phase: SyncPhase::Idle,
        };

        driver.start_counting(&ledger, events_tx.clone()).await;
        tokio::spawn(driver.run());

        Self {
            events: events_tx,
            ledger,
            views: views_rx,
            count: count_rx,
            status: status_rx,
            phase: phase_rx,
        }
    }

    /// Continuously-updated, ordered view sequence.
    pub fn views(&self) -> watch::Receiver<Vec<KittyView>> {
        self.views.clone()
    }

    /// Current record count, for display.
    pub fn kitty_count(&self) -> watch::Receiver<RecordCount> {
        self.count.clone()
    }

    /// Shared status line: the most recent lifecycle phase or error.
    pub fn status(&self) -> watch::Receiver<String> {
        self.status.clone()
    }

    /// Current synchronizer phase.
    pub fn phase(&self) -> watch::Receiver<SyncPhase> {
        self.phase.clone()
    }

    /// Submit a state-changing request; its status flows into the shared
    /// status slot. The returned handle can cancel tracking early.
    pub async fn submit(&self, signer: &Signer, descriptor: RequestDescriptor) -> SubmitHandle {
        let status: StatusSink = {
            let events = self.events.clone();
            Arc::new(move |line| {
                let _ = events.send(SyncEvent::Status(line));
            })
        };
        RequestLifecycle::submit(self.ledger.clone(), signer.clone(), descriptor, status).await
    }

    /// Stop the event loop and release every subscription.
    pub fn shutdown(&self) {
        let _ = self.events.send(SyncEvent::Shutdown);
    }
}

impl Drop for SyncController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Event loop
// ─────────────────────────────────────────────────────────────────────────────

struct Driver {
    viewer: AccountId,
    events_rx: mpsc::UnboundedReceiver<SyncEvent>,
    views_tx: watch::Sender<Vec<KittyView>>,
    count_tx: watch::Sender<RecordCount>,
    status_tx: watch::Sender<String>,
    phase_tx: watch::Sender<SyncPhase>,
    fields: FieldSubscriptionSet<dyn LedgerClient>,
    dnas: HashMap<KittyId, Dna>,
    owners: HashMap<KittyId, AccountId>,
    prices: HashMap<KittyId, Balance>,
    ids: Vec<KittyId>,
    count: RecordCount,
    count_sub: Option<Subscription>,
    phase: SyncPhase,
}

impl Driver {
    async fn start_counting(
        &mut self,
        ledger: &Arc<dyn LedgerClient>,
        events: mpsc::UnboundedSender<SyncEvent>,
    ) {
        let sink = move |count| {
            let _ = events.send(SyncEvent::Count(count));
        };
        match CountWatcher::start(ledger, sink).await {
            Ok(subscription) => {
                self.count_sub = Some(subscription);
                self.set_phase(SyncPhase::Counting);
            }
            Err(err) => {
                // Non-fatal: the view shows zero records.
                tracing::warn!(error = %err, "count subscription setup failed");
                let _ = self.status_tx.send(err.to_string());
            }
        }
    }

    async fn run(mut self) {
        while let Some(event) = self.events_rx.recv().await {
            match event {
                SyncEvent::Count(count) => self.on_count(count).await,
                SyncEvent::Fields(push) => self.on_fields(push),
                SyncEvent::Status(line) => {
                    let _ = self.status_tx.send(line);
                }
                SyncEvent::Shutdown => break,
            }
        }
        // Deterministic release order: fields first, then the count watcher.
        self.fields.release();
        if let Some(subscription) = self.count_sub.take() {
            subscription.cancel();
        }
        tracing::debug!("synchronizer stopped, all subscriptions released");
    }

    async fn on_count(&mut self, count: RecordCount) {
        if count == self.count {
            // The ledger may repeat the current value; nothing to do.
            return;
        }
        tracing::debug!(from = self.count, to = count, "record count changed");
        self.count = count;
        let _ = self.count_tx.send(count);

        self.ids = id_range(count);
        self.dnas.clear();
        self.owners.clear();
        self.prices.clear();

        if count > 0 && self.phase != SyncPhase::Syncing {
            self.set_phase(SyncPhase::Syncing);
        }

        if let Err(err) = self.fields.resubscribe(&self.ids).await {
            tracing::warn!(error = %err, "field resubscription failed");
            let _ = self.status_tx.send(err.to_string());
        }
        self.publish_views();
    }

    fn on_fields(&mut self, push: FieldPush) {
        if push.generation != self.fields.generation() {
            tracing::debug!(
                got = push.generation,
                live = self.fields.generation(),
                "discarding stale field push"
            );
            return;
        }
        if push.values.len() != self.ids.len() {
            tracing::warn!(
                field = %push.field,
                got = push.values.len(),
                expected = self.ids.len(),
                "misaligned field push ignored"
            );
            return;
        }

        // Wholesale replacement of the field's snapshot.
        match push.field {
            KittyField::Dna => {
                self.dnas = Self::snapshot(&self.ids, push.values, FieldValue::into_dna);
            }
            KittyField::Owner => {
                self.owners = Self::snapshot(&self.ids, push.values, FieldValue::into_owner);
            }
            KittyField::Price => {
                self.prices = Self::snapshot(&self.ids, push.values, FieldValue::into_price);
            }
        }
        self.publish_views();
    }

    fn snapshot<T>(
        ids: &[KittyId],
        values: Vec<Option<FieldValue>>,
        extract: impl Fn(FieldValue) -> Option<T>,
    ) -> HashMap<KittyId, T> {
        ids.iter()
            .zip(values)
            .filter_map(|(id, value)| value.and_then(&extract).map(|v| (*id, v)))
            .collect()
    }

    fn publish_views(&self) {
        let views = merge_views(&self.ids, &self.dnas, &self.owners, &self.prices, &self.viewer);
        let _ = self.views_tx.send(views);
    }

    fn set_phase(&mut self, phase: SyncPhase) {
        tracing::debug!(from = ?self.phase, to = ?phase, "sync phase transition");
        self.phase = phase;
        let _ = self.phase_tx.send(phase);
    }
}
