//! Request model for signed state-changing calls.
//!
//! A [`RequestDescriptor`] is the authored intent for one pallet call:
//! callable plus ordered parameters, each flagged as address-typed or plain.
//! It is constructed per user action, consumed once, and discarded. The
//! lifecycle reports progress as [`RequestOutcome`] values, each of which
//! renders to the human-readable status line shown by the presentation
//! layer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CritterError;
use crate::ledger::{BlockRef, TxPhase};

/// Pallet hosting the kitty callables.
pub const KITTIES_PALLET: &str = "kittiesModule";

/// The state-changing callables exposed by the kitties pallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KittyCall {
    /// Mint a new kitty for the signer. No parameters.
    Create,
    /// Transfer a kitty to another account: `(target, id)`.
    Transfer,
    /// List a kitty for sale at a price: `(id, price)`.
    Ask,
    /// Buy a listed kitty: `(id, price)`.
    Buy,
}

impl KittyCall {
    /// Callable name as the pallet exposes it.
    pub fn callable(&self) -> &'static str {
        match self {
            KittyCall::Create => "create",
            KittyCall::Transfer => "transfer",
            KittyCall::Ask => "ask",
            KittyCall::Buy => "buy",
        }
    }

    /// Pallet the callable lives on.
    pub fn pallet(&self) -> &'static str {
        KITTIES_PALLET
    }
}

impl fmt::Display for KittyCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.pallet(), self.callable())
    }
}

/// Parameter classification used by pre-flight validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// An account address; must be non-empty before dispatch.
    Address,
    /// Any other scalar, passed through as authored.
    Plain,
}

/// One ordered call parameter, as authored by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallParam {
    /// Raw authored value; the ledger client performs wire encoding.
    pub value: String,
    /// Classification for validation.
    pub kind: ParamKind,
}

impl CallParam {
    /// An address-typed parameter.
    pub fn address(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: ParamKind::Address,
        }
    }

    /// A plain parameter.
    pub fn plain(value: impl fmt::Display) -> Self {
        Self {
            value: value.to_string(),
            kind: ParamKind::Plain,
        }
    }
}

/// Describes one state-changing invocation prior to signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// Target callable.
    pub call: KittyCall,
    /// Ordered parameters, in the pallet's declared order.
    pub params: Vec<CallParam>,
}

impl RequestDescriptor {
    /// Start a descriptor with no parameters.
    pub fn new(call: KittyCall) -> Self {
        Self {
            call,
            params: Vec::new(),
        }
    }

    /// Append an address-typed parameter.
    pub fn with_address(mut self, value: impl Into<String>) -> Self {
        self.params.push(CallParam::address(value));
        self
    }

    /// Append a plain parameter.
    pub fn with_plain(mut self, value: impl fmt::Display) -> Self {
        self.params.push(CallParam::plain(value));
        self
    }

    /// Pre-flight validation: every address-typed parameter must be
    /// non-empty. Runs before any ledger interaction.
    pub fn validate(&self) -> Result<(), CritterError> {
        for (index, param) in self.params.iter().enumerate() {
            if param.kind == ParamKind::Address && param.value.trim().is_empty() {
                return Err(CritterError::validation(format!(
                    "missing parameter {index} for {}",
                    self.call
                )));
            }
        }
        Ok(())
    }
}

/// Outcome of a submitted request, as observed by the client.
///
/// `Finalized`, `Failed` and `Rejected` are terminal: once one is produced
/// the tracking subscription is released and no further transitions are
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Accepted into the pool.
    Ready,
    /// Gossiped to peers.
    Broadcast,
    /// Included in a (not yet final) block.
    InBlock(BlockRef),
    /// Included in a finalized block. Terminal.
    Finalized(BlockRef),
    /// Included but the dispatch errored. Terminal.
    Failed(String),
    /// Refused before inclusion: pre-flight validation or broadcast
    /// rejection. Terminal.
    Rejected(String),
}

impl RequestOutcome {
    /// Whether this outcome ends the request's lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestOutcome::Finalized(_) | RequestOutcome::Failed(_) | RequestOutcome::Rejected(_)
        )
    }

    /// Map a ledger-reported inclusion phase onto an outcome.
    pub fn from_phase(phase: TxPhase) -> Self {
        match phase {
            TxPhase::Ready => RequestOutcome::Ready,
            TxPhase::Broadcast => RequestOutcome::Broadcast,
            TxPhase::InBlock(block) => RequestOutcome::InBlock(block),
            TxPhase::Finalized(block) => RequestOutcome::Finalized(block),
            TxPhase::Failed(reason) => RequestOutcome::Failed(reason),
        }
    }

    /// Human-readable status line for the shared status slot.
    pub fn status_line(&self) -> String {
        match self {
            RequestOutcome::Ready => "Current transaction status: Ready".to_owned(),
            RequestOutcome::Broadcast => "Current transaction status: Broadcast".to_owned(),
            RequestOutcome::InBlock(block) => {
                format!("Current transaction status: InBlock({block})")
            }
            RequestOutcome::Finalized(block) => {
                format!("\u{1f609} Finalized. Block hash: {block}")
            }
            RequestOutcome::Failed(reason) => {
                format!("\u{1f61e} Transaction Failed: {reason}")
            }
            RequestOutcome::Rejected(reason) => {
                format!("\u{1f61e} Transaction Rejected: {reason}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callable_names() {
        assert_eq!(KittyCall::Create.callable(), "create");
        assert_eq!(KittyCall::Transfer.callable(), "transfer");
        assert_eq!(KittyCall::Ask.callable(), "ask");
        assert_eq!(KittyCall::Buy.callable(), "buy");
        assert_eq!(KittyCall::Buy.to_string(), "kittiesModule.buy");
    }

    #[test]
    fn test_validate_rejects_empty_address() {
        let descriptor = RequestDescriptor::new(KittyCall::Transfer)
            .with_address("")
            .with_plain(3u32);
        let err = descriptor.validate().unwrap_err();
        assert!(matches!(err, CritterError::Validation(_)));
        assert!(err.to_string().contains("missing parameter 0"));
    }

    #[test]
    fn test_validate_rejects_whitespace_address() {
        let descriptor = RequestDescriptor::new(KittyCall::Transfer)
            .with_address("   ")
            .with_plain(3u32);
        assert!(descriptor.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_empty_plain_params() {
        // Plain parameters carry whatever the form held; only addresses are
        // checked before dispatch.
        let descriptor = RequestDescriptor::new(KittyCall::Ask)
            .with_plain(0u32)
            .with_plain("");
        assert!(descriptor.validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_no_params() {
        assert!(RequestDescriptor::new(KittyCall::Create).validate().is_ok());
    }

    #[test]
    fn test_terminal_outcomes() {
        assert!(!RequestOutcome::Ready.is_terminal());
        assert!(!RequestOutcome::Broadcast.is_terminal());
        assert!(!RequestOutcome::InBlock(BlockRef::from("0xaa")).is_terminal());
        assert!(RequestOutcome::Finalized(BlockRef::from("0xaa")).is_terminal());
        assert!(RequestOutcome::Failed("boom".into()).is_terminal());
        assert!(RequestOutcome::Rejected("nope".into()).is_terminal());
    }

    #[test]
    fn test_phase_mapping() {
        assert_eq!(
            RequestOutcome::from_phase(TxPhase::Ready),
            RequestOutcome::Ready
        );
        assert_eq!(
            RequestOutcome::from_phase(TxPhase::Finalized(BlockRef::from("0xbb"))),
            RequestOutcome::Finalized(BlockRef::from("0xbb"))
        );
        assert_eq!(
            RequestOutcome::from_phase(TxPhase::Failed("dispatch error".into())),
            RequestOutcome::Failed("dispatch error".into())
        );
    }

    #[test]
    fn test_status_lines() {
        assert_eq!(
            RequestOutcome::Ready.status_line(),
            "Current transaction status: Ready"
        );
        let line = RequestOutcome::Finalized(BlockRef::from("0xcc")).status_line();
        assert!(line.contains("Finalized. Block hash: 0xcc"));
        let line = RequestOutcome::Failed("bad".into()).status_line();
        assert!(line.contains("Transaction Failed: bad"));
    }
}
