//! Multi-key field subscriptions over the current identifier list.

use std::sync::Arc;

use critter_core::{
    CritterError, Disposer, FieldValue, KittyField, KittyId, LedgerQueries, MultiHandler,
};

/// One batched push from a field subscription.
///
/// `values` is the full replacement vector, positionally aligned with the id
/// list the subscription was opened for. `generation` identifies which
/// `resubscribe` call opened the subscription; consumers discard pushes whose
/// generation is no longer current, which closes the race between a
/// cancellation and a push already in flight.
#[derive(Debug, Clone)]
pub struct FieldPush {
    /// Generation of the originating subscription set.
    pub generation: u64,
    /// Which storage field was pushed.
    pub field: KittyField,
    /// Full replacement vector aligned with the subscribed id list.
    pub values: Vec<Option<FieldValue>>,
}

/// Sink receiving every field push from the live generation onward.
pub type FieldSink = Arc<dyn Fn(FieldPush) + Send + Sync>;

/// Owns the three per-field multi-key subscriptions for one id list.
///
/// Each call to [`resubscribe`](Self::resubscribe) first releases exactly
/// the subscriptions the previous call opened, bumps the generation, then
/// opens fresh DNA/owner/price subscriptions scoped to the new list. An
/// identical consecutive list still performs the full release+reopen. With
/// an empty list nothing is opened at all.
pub struct FieldSubscriptionSet<L: ?Sized> {
    ledger: Arc<L>,
    sink: FieldSink,
    active: Disposer,
    generation: u64,
}

impl<L: LedgerQueries + ?Sized> FieldSubscriptionSet<L> {
    /// Create an empty set; no subscriptions are opened until the first
    /// `resubscribe`.
    pub fn new(ledger: Arc<L>, sink: FieldSink) -> Self {
        Self {
            ledger,
            sink,
            active: Disposer::new(),
            generation: 0,
        }
    }

    /// Generation of the currently live subscription set. Pushes tagged with
    /// any other generation are stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of currently open field subscriptions.
    pub fn live_subscriptions(&self) -> usize {
        self.active.len()
    }

    /// Release the previous generation and open subscriptions for `ids`.
    ///
    /// On error, subscriptions already opened for the new generation stay
    /// tracked and are released by the next `resubscribe` or by
    /// [`release`](Self::release); there is still at most one live
    /// subscription per field.
    pub async fn resubscribe(&mut self, ids: &[KittyId]) -> Result<(), CritterError> {
        // Old generation goes first so duplicate callbacks can never overlap.
        self.active.cancel_all();
        self.generation += 1;

        if ids.is_empty() {
            tracing::debug!(generation = self.generation, "empty id list, nothing to watch");
            return Ok(());
        }

        for field in KittyField::ALL {
            let sink = self.sink.clone();
            let generation = self.generation;
            let handler: MultiHandler = Arc::new(move |values| {
                sink(FieldPush {
                    generation,
                    field,
                    values,
                });
            });
            let subscription = self
                .ledger
                .subscribe_multi(field, ids.to_vec(), handler)
                .await?;
            self.active.push(subscription);
        }
        tracing::debug!(
            generation = self.generation,
            ids = ids.len(),
            "field subscriptions reopened"
        );
        Ok(())
    }

    /// Release every live subscription without opening new ones.
    pub fn release(&mut self) {
        self.active.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use critter_testkit::{dna, MockLedger};
    use std::sync::Mutex;

    fn collect_sink() -> (FieldSink, Arc<Mutex<Vec<FieldPush>>>) {
        let pushes = Arc::new(Mutex::new(Vec::new()));
        let sink_pushes = pushes.clone();
        let sink: FieldSink = Arc::new(move |push| {
            sink_pushes.lock().unwrap().push(push);
        });
        (sink, pushes)
    }

    fn ids(upper: u32) -> Vec<KittyId> {
        (0..upper).map(KittyId).collect()
    }

    #[tokio::test]
    async fn test_empty_ids_open_nothing() {
        let ledger = Arc::new(MockLedger::new());
        let (sink, _pushes) = collect_sink();
        let mut set = FieldSubscriptionSet::new(ledger.clone(), sink);

        set.resubscribe(&[]).await.unwrap();
        assert_eq!(set.live_subscriptions(), 0);
        assert_eq!(ledger.opened(), 0);
    }

    #[tokio::test]
    async fn test_opens_one_subscription_per_field() {
        let ledger = Arc::new(MockLedger::new());
        let (sink, _pushes) = collect_sink();
        let mut set = FieldSubscriptionSet::new(ledger.clone(), sink);

        set.resubscribe(&ids(2)).await.unwrap();
        assert_eq!(set.live_subscriptions(), 3);
        assert_eq!(ledger.opened(), 3);
        for field in KittyField::ALL {
            assert_eq!(ledger.live_multi(field), 1);
        }
    }

    #[tokio::test]
    async fn test_resubscribe_balances_open_and_cancel() {
        let ledger = Arc::new(MockLedger::new());
        let (sink, _pushes) = collect_sink();
        let mut set = FieldSubscriptionSet::new(ledger.clone(), sink);

        for round in 1..=4u64 {
            set.resubscribe(&ids(3)).await.unwrap();
            assert_eq!(set.generation(), round);
            // Never more than one live subscription per field.
            for field in KittyField::ALL {
                assert_eq!(ledger.live_multi(field), 1);
            }
        }
        assert_eq!(ledger.opened(), 12);
        assert_eq!(ledger.cancelled(), 9);

        set.release();
        assert!(ledger.is_balanced());

        // A second release has nothing left to do.
        set.release();
        assert_eq!(ledger.cancelled(), 12);
    }

    #[tokio::test]
    async fn test_pushes_carry_current_generation() {
        let ledger = Arc::new(MockLedger::new());
        let (sink, pushes) = collect_sink();
        let mut set = FieldSubscriptionSet::new(ledger.clone(), sink);

        set.resubscribe(&ids(2)).await.unwrap();
        ledger.push_dnas(vec![Some(dna(1)), Some(dna(2))]);

        set.resubscribe(&ids(2)).await.unwrap();
        ledger.push_dnas(vec![Some(dna(3)), Some(dna(4))]);

        let pushes = pushes.lock().unwrap();
        assert_eq!(pushes.len(), 2);
        assert_eq!(pushes[0].generation, 1);
        assert_eq!(pushes[1].generation, 2);
        assert_eq!(pushes[1].field, KittyField::Dna);
        assert_eq!(pushes[1].values.len(), 2);
    }

    #[tokio::test]
    async fn test_shrinking_to_empty_releases_everything() {
        let ledger = Arc::new(MockLedger::new());
        let (sink, _pushes) = collect_sink();
        let mut set = FieldSubscriptionSet::new(ledger.clone(), sink);

        set.resubscribe(&ids(5)).await.unwrap();
        set.resubscribe(&[]).await.unwrap();

        assert_eq!(set.live_subscriptions(), 0);
        assert!(ledger.is_balanced());
    }
}
