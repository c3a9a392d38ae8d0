//! # Critter Core
//!
//! Domain types and capability traits shared by every layer of the critter
//! client. This crate knows nothing about how subscriptions are scheduled or
//! how views reach a screen; it defines:
//!
//! - the kitty domain model ([`KittyId`], [`Dna`], [`AccountId`], [`KittyView`])
//! - the ledger capability traits ([`LedgerQueries`], [`LedgerSubmit`]) through
//!   which the external chain client is injected
//! - the cancel-once [`Subscription`] guard and [`Disposer`] set that make
//!   subscription release explicit and exactly-once
//! - the request model ([`RequestDescriptor`], [`RequestOutcome`]) for signed
//!   state-changing calls
//! - deterministic [`Avatar`] derivation from DNA for presentation layers
//!
//! # Design Principles
//!
//! - **Capabilities over globals**: the ledger client and signer are always
//!   passed in; nothing here reads ambient state.
//! - **Wholesale replacement**: pushed values replace prior state atomically;
//!   no type in this crate supports partial in-place update from the wire.
//! - **Explicit release**: every subscription primitive returns a guard whose
//!   cancellation runs exactly once, on `cancel()` or on drop.

#![warn(missing_docs)]

pub mod avatar;
pub mod error;
pub mod ledger;
pub mod request;
pub mod subscription;
pub mod types;

pub use avatar::Avatar;
pub use error::CritterError;
pub use ledger::{
    BlockRef, CountHandler, FieldValue, KittyField, LedgerClient, LedgerQueries, LedgerSubmit,
    MultiHandler, PhaseHandler, Signer, TxPhase,
};
pub use request::{CallParam, KittyCall, ParamKind, RequestDescriptor, RequestOutcome};
pub use subscription::{Disposer, Subscription};
pub use types::{id_range, AccountId, Balance, Dna, KittyId, KittyView, RecordCount, DNA_BYTES};
