//! Scalar record-count watcher.

use std::sync::Arc;

use critter_core::{CountHandler, CritterError, LedgerQueries, RecordCount, Subscription};

/// Watches the ledger's scalar kitty count.
///
/// Forwards every push to the sink, including pushes that repeat the current
/// value; deduplication is the consumer's concern. Setup failure is
/// non-fatal for the client as a whole: the caller surfaces it to the status
/// slot and the count simply stays at zero.
pub struct CountWatcher;

impl CountWatcher {
    /// Open the count subscription, forwarding pushes into `sink`.
    pub async fn start<L>(
        ledger: &Arc<L>,
        sink: impl Fn(RecordCount) + Send + Sync + 'static,
    ) -> Result<Subscription, CritterError>
    where
        L: LedgerQueries + ?Sized,
    {
        let handler: CountHandler = Arc::new(sink);
        ledger.subscribe_count(handler).await
    }
}
