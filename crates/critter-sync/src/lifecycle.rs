//! Signed request lifecycle: validate → sign+submit → track inclusion.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};

use critter_core::{
    CritterError, LedgerSubmit, PhaseHandler, RequestDescriptor, RequestOutcome, Signer,
};

/// Sink receiving the human-readable status line for each lifecycle step.
/// The last line written persists until the next action overwrites it.
pub type StatusSink = Arc<dyn Fn(String) + Send + Sync>;

/// Handle to one in-flight request.
///
/// Dropping the handle does **not** cancel tracking; the lifecycle keeps
/// following phases to the terminal outcome so the status slot stays
/// truthful. Only [`cancel`](Self::cancel) releases the tracking
/// subscription early (the user dismissed the action).
#[derive(Debug)]
pub struct SubmitHandle {
    terminal: oneshot::Receiver<RequestOutcome>,
    cancel: Option<watch::Sender<bool>>,
}

impl SubmitHandle {
    /// Stop tracking now. The subscription is released; no terminal outcome
    /// will be produced. Safe to call more than once.
    pub fn cancel(&self) {
        if let Some(cancel) = &self.cancel {
            let _ = cancel.send(true);
        }
    }

    /// Wait for the terminal outcome. `None` means tracking was cancelled
    /// before the request reached a terminal state.
    pub async fn wait(self) -> Option<RequestOutcome> {
        self.terminal.await.ok()
    }
}

/// Drives one state-changing request through
/// `Ready -> Broadcast -> InBlock -> {Finalized | Failed}`, or straight to
/// `Rejected` when pre-flight validation or the broadcast itself refuses it.
pub struct RequestLifecycle;

impl RequestLifecycle {
    /// Validate, sign+submit, and track `descriptor`.
    ///
    /// Exactly one terminal outcome is produced per call unless the caller
    /// cancels first, and the tracking subscription is released exactly once
    /// in every case: terminal phase, explicit cancel, or ledger-side stream
    /// end. Every intermediate and terminal outcome is rendered to `status`.
    pub async fn submit<L>(
        ledger: Arc<L>,
        signer: Signer,
        descriptor: RequestDescriptor,
        status: StatusSink,
    ) -> SubmitHandle
    where
        L: LedgerSubmit + ?Sized + 'static,
    {
        // Fail fast on missing address parameters, before any ledger contact.
        if let Err(err) = descriptor.validate() {
            return Self::rejected(err, &status);
        }

        let (phase_tx, phase_rx) = mpsc::unbounded_channel();
        let on_phase: PhaseHandler = Arc::new(move |phase| {
            let _ = phase_tx.send(phase);
        });

        let tracking = match ledger.submit_signed(&signer, &descriptor, on_phase).await {
            Ok(tracking) => tracking,
            Err(err) => return Self::rejected(err, &status),
        };

        let (terminal_tx, terminal_rx) = oneshot::channel();
        let (cancel_tx, cancel_rx) = watch::channel(false);

        tokio::spawn(Self::track(
            tracking,
            phase_rx,
            cancel_rx,
            terminal_tx,
            status,
        ));

        SubmitHandle {
            terminal: terminal_rx,
            cancel: Some(cancel_tx),
        }
    }

    fn rejected(err: CritterError, status: &StatusSink) -> SubmitHandle {
        let outcome = RequestOutcome::Rejected(err.to_string());
        tracing::debug!(reason = %err, "request rejected before broadcast");
        status(outcome.status_line());

        let (terminal_tx, terminal_rx) = oneshot::channel();
        let _ = terminal_tx.send(outcome);
        SubmitHandle {
            terminal: terminal_rx,
            cancel: None,
        }
    }

    async fn track(
        tracking: critter_core::Subscription,
        mut phases: mpsc::UnboundedReceiver<critter_core::TxPhase>,
        mut cancel: watch::Receiver<bool>,
        terminal_tx: oneshot::Sender<RequestOutcome>,
        status: StatusSink,
    ) {
        let mut cancel_open = true;
        let terminal = loop {
            tokio::select! {
                changed = cancel.changed(), if cancel_open => {
                    match changed {
                        Ok(()) if *cancel.borrow() => {
                            tracing::debug!("request tracking cancelled by caller");
                            break None;
                        }
                        Ok(()) => {}
                        // Handle dropped without cancelling: keep tracking.
                        Err(_) => cancel_open = false,
                    }
                }
                phase = phases.recv() => {
                    match phase {
                        None => break None,
                        Some(phase) => {
                            let outcome = RequestOutcome::from_phase(phase);
                            status(outcome.status_line());
                            if outcome.is_terminal() {
                                break Some(outcome);
                            }
                        }
                    }
                }
            }
        };

        // Single release point, regardless of which way the loop ended.
        tracking.cancel();

        if let Some(outcome) = terminal {
            let _ = terminal_tx.send(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use critter_core::{AccountId, BlockRef, KittyCall, TxPhase};
    use critter_testkit::{signer, wait_for, MockLedger};
    use std::sync::Mutex;

    fn status_log() -> (StatusSink, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink_lines = lines.clone();
        let sink: StatusSink = Arc::new(move |line| {
            sink_lines.lock().unwrap().push(line);
        });
        (sink, lines)
    }

    #[tokio::test]
    async fn test_missing_address_rejected_without_broadcast() {
        let ledger = Arc::new(MockLedger::new());
        let (status, lines) = status_log();

        let descriptor = RequestDescriptor::new(KittyCall::Transfer)
            .with_address("")
            .with_plain(0u32);
        let handle =
            RequestLifecycle::submit(ledger.clone(), signer("alice"), descriptor, status).await;

        let outcome = handle.wait().await;
        assert!(matches!(outcome, Some(RequestOutcome::Rejected(_))));
        // The broadcast collaborator was never contacted.
        assert!(ledger.submissions().is_empty());
        assert_eq!(ledger.opened(), 0);
        assert!(lines.lock().unwrap()[0].contains("Rejected"));
    }

    #[tokio::test]
    async fn test_broadcast_rejection_becomes_rejected_outcome() {
        let ledger = Arc::new(MockLedger::new());
        ledger.reject_submissions("account balance too low");
        let (status, _lines) = status_log();

        let handle = RequestLifecycle::submit(
            ledger.clone(),
            signer("alice"),
            RequestDescriptor::new(KittyCall::Create),
            status,
        )
        .await;

        match handle.wait().await {
            Some(RequestOutcome::Rejected(reason)) => {
                assert!(reason.contains("balance too low"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert!(ledger.is_balanced());
    }

    #[tokio::test]
    async fn test_cancel_releases_tracking_without_terminal() {
        let ledger = Arc::new(MockLedger::new());
        let (status, _lines) = status_log();

        let handle = RequestLifecycle::submit(
            ledger.clone(),
            signer("alice"),
            RequestDescriptor::new(KittyCall::Create),
            status,
        )
        .await;
        assert_eq!(ledger.opened(), 1);

        ledger.emit_phase(TxPhase::Ready);
        handle.cancel();

        wait_for(|| ledger.is_balanced()).await;
        assert_eq!(handle.wait().await, None);
    }

    #[tokio::test]
    async fn test_drop_handle_keeps_tracking_to_terminal() {
        let ledger = Arc::new(MockLedger::new());
        let (status, lines) = status_log();

        let handle = RequestLifecycle::submit(
            ledger.clone(),
            signer("alice"),
            RequestDescriptor::new(KittyCall::Create),
            status,
        )
        .await;
        drop(handle);

        ledger.emit_phase(TxPhase::Ready);
        ledger.emit_phase(TxPhase::Finalized(BlockRef::from("0xfeed")));

        wait_for(|| ledger.is_balanced()).await;
        let lines = lines.lock().unwrap();
        assert!(lines.iter().any(|l| l.contains("Block hash: 0xfeed")));
    }

    #[tokio::test]
    async fn test_signer_address_reaches_ledger() {
        let ledger = Arc::new(MockLedger::new());
        let (status, _lines) = status_log();

        let _handle = RequestLifecycle::submit(
            ledger.clone(),
            signer("alice"),
            RequestDescriptor::new(KittyCall::Create),
            status,
        )
        .await;

        let submissions = ledger.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].0.address(), &AccountId::new("alice"));
        assert_eq!(submissions[0].1.call, KittyCall::Create);
    }
}
