//! Ledger capability traits.
//!
//! The external chain client is consumed exclusively through these traits,
//! injected at construction time. The client owns transport, storage paths,
//! and signing key material; this crate only models the push contracts:
//!
//! - a scalar count subscription,
//! - batched per-identifier ("multi") field subscriptions delivering a full
//!   positionally-aligned replacement vector on every change,
//! - signed request submission streaming inclusion phases.
//!
//! Every primitive returns a [`Subscription`] guard; release is always the
//! caller's responsibility and runs exactly once.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CritterError;
use crate::request::RequestDescriptor;
use crate::subscription::Subscription;
use crate::types::{AccountId, Balance, Dna, KittyId, RecordCount};

// ─────────────────────────────────────────────────────────────────────────────
// Storage fields
// ─────────────────────────────────────────────────────────────────────────────

/// Per-kitty storage field tracked by a multi-query subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KittyField {
    /// Genetic payload; present from the moment a kitty exists.
    Dna,
    /// Owning account; present from the moment a kitty exists.
    Owner,
    /// Sale price; absent while the kitty is not for sale.
    Price,
}

impl KittyField {
    /// All tracked fields, in subscription order.
    pub const ALL: [KittyField; 3] = [KittyField::Dna, KittyField::Owner, KittyField::Price];

    /// Storage item name on the kitties pallet.
    pub fn storage_name(&self) -> &'static str {
        match self {
            KittyField::Dna => "kitties",
            KittyField::Owner => "kittyOwners",
            KittyField::Price => "kittyPrices",
        }
    }
}

impl fmt::Display for KittyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_name())
    }
}

/// One per-kitty value delivered by a multi-query push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A [`KittyField::Dna`] value.
    Dna(Dna),
    /// A [`KittyField::Owner`] value.
    Owner(AccountId),
    /// A [`KittyField::Price`] value.
    Price(Balance),
}

impl FieldValue {
    /// Extract a DNA value.
    pub fn into_dna(self) -> Option<Dna> {
        match self {
            FieldValue::Dna(dna) => Some(dna),
            _ => None,
        }
    }

    /// Extract an owner value.
    pub fn into_owner(self) -> Option<AccountId> {
        match self {
            FieldValue::Owner(owner) => Some(owner),
            _ => None,
        }
    }

    /// Extract a price value.
    pub fn into_price(self) -> Option<Balance> {
        match self {
            FieldValue::Price(price) => Some(price),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inclusion phases
// ─────────────────────────────────────────────────────────────────────────────

/// Reference to the block that included a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockRef(pub String);

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockRef {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

/// Inclusion phase of a submitted request as reported by the ledger.
///
/// Within one submission, phases are delivered in the order the ledger emits
/// them. `Finalized` and `Failed` are terminal on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxPhase {
    /// Accepted into the local pool.
    Ready,
    /// Gossiped to peers.
    Broadcast,
    /// Included in a (not yet final) block.
    InBlock(BlockRef),
    /// Included in a finalized block.
    Finalized(BlockRef),
    /// Included but the call's dispatch failed.
    Failed(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Signer
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to the viewer's active key pair.
///
/// Signing internals live inside the ledger client; the core only ever needs
/// the printable address for ownership checks and display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signer {
    address: AccountId,
}

impl Signer {
    /// Create a signer handle for an address held by the ledger client.
    pub fn new(address: AccountId) -> Self {
        Self { address }
    }

    /// The signer's public address.
    pub fn address(&self) -> &AccountId {
        &self.address
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Capability traits
// ─────────────────────────────────────────────────────────────────────────────

/// Callback invoked with each scalar count push.
pub type CountHandler = Arc<dyn Fn(RecordCount) + Send + Sync>;

/// Callback invoked with each multi-query push: a full replacement vector
/// positionally aligned with the subscribed id list.
pub type MultiHandler = Arc<dyn Fn(Vec<Option<FieldValue>>) + Send + Sync>;

/// Callback invoked with each inclusion phase of a submitted request.
pub type PhaseHandler = Arc<dyn Fn(TxPhase) + Send + Sync>;

/// Read-side ledger capability: push subscriptions over kitty storage.
#[async_trait]
pub trait LedgerQueries: Send + Sync {
    /// Subscribe to the scalar kitty count. The handler fires on every push,
    /// including pushes repeating the current value.
    async fn subscribe_count(&self, on_count: CountHandler)
        -> Result<Subscription, CritterError>;

    /// Subscribe to one storage field for a batch of ids. Every push delivers
    /// a full replacement vector aligned with `ids`; partial updates are not
    /// part of the contract.
    async fn subscribe_multi(
        &self,
        field: KittyField,
        ids: Vec<KittyId>,
        on_values: MultiHandler,
    ) -> Result<Subscription, CritterError>;
}

/// Write-side ledger capability: signed request submission.
#[async_trait]
pub trait LedgerSubmit: Send + Sync {
    /// Sign and broadcast a request, streaming inclusion phases to
    /// `on_phase`. Returns the tracking subscription; an `Err` means the
    /// request was rejected before or at broadcast.
    async fn submit_signed(
        &self,
        signer: &Signer,
        descriptor: &RequestDescriptor,
        on_phase: PhaseHandler,
    ) -> Result<Subscription, CritterError>;
}

/// Full ledger client capability.
pub trait LedgerClient: LedgerQueries + LedgerSubmit {}

impl<T: LedgerQueries + LedgerSubmit> LedgerClient for T {}
