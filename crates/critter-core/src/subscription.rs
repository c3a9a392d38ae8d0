//! Cancel-once subscription guards.
//!
//! Every push-based primitive in the ledger interface returns a
//! [`Subscription`]: a guard wrapping the cancel closure handed back by the
//! transport. Release runs exactly once, either through an explicit
//! [`Subscription::cancel`] or when the guard is dropped. [`Disposer`]
//! collects guards so an owner can release a whole generation
//! deterministically before opening the next one.

use std::fmt;

/// Guard for one live ledger subscription.
///
/// Dropping the guard releases the subscription. Explicit cancellation and
/// drop compose safely: the underlying closure is consumed on first release
/// and later releases are no-ops.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap a transport-provided cancel closure.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A guard with nothing to release.
    ///
    /// Used for requests that terminate before any subscription was opened,
    /// e.g. a submission rejected by pre-flight validation.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Whether the subscription is still live (not yet released).
    pub fn is_live(&self) -> bool {
        self.cancel.is_some()
    }

    /// Release the subscription now.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("live", &self.is_live())
            .finish()
    }
}

/// An explicit set of outstanding subscriptions with deterministic release.
///
/// Owners push every guard they open and call [`Disposer::cancel_all`] on
/// teardown or before re-subscribing; this replaces implicit reliance on
/// enclosing-scope cleanup.
#[derive(Default, Debug)]
pub struct Disposer {
    subscriptions: Vec<Subscription>,
}

impl Disposer {
    /// Create an empty disposer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a subscription for later release.
    pub fn push(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    /// Number of tracked (live) subscriptions.
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether no subscriptions are tracked.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release every tracked subscription, in insertion order.
    pub fn cancel_all(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.cancel();
        }
    }
}
