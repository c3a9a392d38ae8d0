//! Small helpers shared across test suites.

use std::time::Duration;

use critter_core::{AccountId, Dna, Signer, DNA_BYTES};

/// Deterministic DNA filled with `seed`.
pub fn dna(seed: u8) -> Dna {
    Dna([seed; DNA_BYTES])
}

/// Signer handle for a named test account.
pub fn signer(name: &str) -> Signer {
    Signer::new(AccountId::new(name))
}

/// Poll `condition` until it holds, panicking after one second.
///
/// Used where a test waits for a background task to process an event that
/// has no dedicated notification, e.g. subscription accounting reaching a
/// balanced state.
pub async fn wait_for(mut condition: impl FnMut() -> bool) {
    let deadline = Duration::from_secs(1);
    let poll = Duration::from_millis(5);
    let result = tokio::time::timeout(deadline, async {
        while !condition() {
            tokio::time::sleep(poll).await;
        }
    })
    .await;
    if result.is_err() {
        panic!("condition not reached within {deadline:?}");
    }
}
