//! Application facade wiring the synchronizer to a frontend.

use std::sync::Arc;

use tokio::sync::watch;

use critter_core::{
    AccountId, Balance, CritterError, KittyId, KittyView, LedgerClient, RecordCount, Signer,
};
use critter_sync::{SubmitHandle, SyncController};

use crate::intents;

/// Headless application core for one viewer.
///
/// Owns the synchronizer for the viewer's address and exposes the read-only
/// outward surface plus one method per user action. Dropping the app tears
/// the synchronizer down and releases every subscription.
pub struct KittiesApp {
    controller: SyncController,
    signer: Signer,
}

impl KittiesApp {
    /// Start the app for `signer` against an injected ledger client.
    pub async fn start(ledger: Arc<dyn LedgerClient>, signer: Signer) -> Self {
        let controller = SyncController::spawn(ledger, signer.address().clone()).await;
        Self { controller, signer }
    }

    /// The viewer's address.
    pub fn viewer(&self) -> &AccountId {
        self.signer.address()
    }

    /// Continuously-updated, ordered kitty views.
    pub fn views(&self) -> watch::Receiver<Vec<KittyView>> {
        self.controller.views()
    }

    /// Current record count.
    pub fn kitty_count(&self) -> watch::Receiver<RecordCount> {
        self.controller.kitty_count()
    }

    /// Shared status line: most recent request phase or error.
    pub fn status(&self) -> watch::Receiver<String> {
        self.controller.status()
    }

    /// Mint a new kitty for the viewer.
    pub async fn create(&self) -> SubmitHandle {
        self.controller
            .submit(&self.signer, intents::create())
            .await
    }

    /// Transfer an owned kitty to `target`.
    pub async fn transfer(&self, target: &AccountId, id: KittyId) -> SubmitHandle {
        self.controller
            .submit(&self.signer, intents::transfer(target, id))
            .await
    }

    /// List an owned kitty for sale at `price`.
    pub async fn set_price(&self, id: KittyId, price: Balance) -> SubmitHandle {
        self.controller
            .submit(&self.signer, intents::set_price(id, price))
            .await
    }

    /// Buy a kitty from its current view, at its listed price.
    ///
    /// Refused locally when the view carries no price or is already owned by
    /// the viewer; the ledger is not contacted in that case.
    pub async fn buy(&self, view: &KittyView) -> Result<SubmitHandle, CritterError> {
        let price = match view.price {
            Some(price) if view.can_buy() => price,
            Some(_) => {
                return Err(CritterError::validation(format!(
                    "kitty {} is already owned by the viewer",
                    view.id
                )))
            }
            None => {
                return Err(CritterError::validation(format!(
                    "kitty {} is not for sale",
                    view.id
                )))
            }
        };
        Ok(self
            .controller
            .submit(&self.signer, intents::buy(view.id, price))
            .await)
    }

    /// Stop synchronizing and release every subscription.
    pub fn shutdown(&self) {
        self.controller.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use critter_core::{Dna, KittyCall, RequestOutcome, DNA_BYTES};
    use critter_testkit::{signer, wait_for, MockLedger};

    fn foreign_view(price: Option<Balance>) -> KittyView {
        KittyView {
            id: KittyId(1),
            dna: Dna([9; DNA_BYTES]),
            owner: AccountId::new("bob"),
            is_owned: false,
            price,
        }
    }

    #[tokio::test]
    async fn test_views_follow_ledger_pushes() {
        let ledger = Arc::new(MockLedger::new());
        let app = KittiesApp::start(ledger.clone(), signer("alice")).await;
        let mut views = app.views();

        ledger.push_count(2);
        views.changed().await.unwrap();

        ledger.push_dnas(vec![Some(Dna([1; DNA_BYTES])), Some(Dna([2; DNA_BYTES]))]);
        views.changed().await.unwrap();
        ledger.push_owners(vec![
            Some(AccountId::new("alice")),
            Some(AccountId::new("bob")),
        ]);
        views.changed().await.unwrap();

        let snapshot = views.borrow().clone();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot[0].is_owned);
        assert!(!snapshot[1].is_owned);
        assert_eq!(*app.kitty_count().borrow(), 2);
    }

    #[tokio::test]
    async fn test_buy_refused_without_price() {
        let ledger = Arc::new(MockLedger::new());
        let app = KittiesApp::start(ledger.clone(), signer("alice")).await;

        let err = app.buy(&foreign_view(None)).await.unwrap_err();
        assert!(matches!(err, CritterError::Validation(_)));
        assert!(ledger.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_buy_submits_listed_price() {
        let ledger = Arc::new(MockLedger::new());
        let app = KittiesApp::start(ledger.clone(), signer("alice")).await;

        let handle = app.buy(&foreign_view(Some(300))).await.unwrap();

        let submissions = ledger.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].1.call, KittyCall::Buy);
        assert_eq!(submissions[0].1.params[1].value, "300");

        handle.cancel();
        wait_for(|| {
            // Count subscription stays live; only the tracking one closes.
            ledger.cancelled() == 1
        })
        .await;
    }

    #[tokio::test]
    async fn test_create_status_reaches_shared_slot() {
        let ledger = Arc::new(MockLedger::new());
        let app = KittiesApp::start(ledger.clone(), signer("alice")).await;
        let mut status = app.status();

        let handle = app.create().await;
        ledger.emit_phase(critter_core::TxPhase::Ready);

        status.changed().await.unwrap();
        assert_eq!(*status.borrow(), RequestOutcome::Ready.status_line());
        drop(handle);
    }

    #[tokio::test]
    async fn test_drop_releases_all_subscriptions() {
        let ledger = Arc::new(MockLedger::new());
        {
            let app = KittiesApp::start(ledger.clone(), signer("alice")).await;
            let mut views = app.views();
            ledger.push_count(1);
            views.changed().await.unwrap();
            assert_eq!(ledger.opened(), 4);
        }
        wait_for(|| ledger.is_balanced()).await;
    }
}
