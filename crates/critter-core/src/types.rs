//! Kitty domain model.
//!
//! All of these types are plain values. Raw field snapshots delivered by the
//! ledger are keyed by [`KittyId`] and replaced wholesale per push; the merged
//! [`KittyView`] is recomputed on every push and never fed back upstream.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of bytes in a kitty's DNA.
pub const DNA_BYTES: usize = 16;

/// Authoritative total number of kitties allocated by the ledger.
///
/// Replaced wholesale on every count push; client logic never decrements it.
pub type RecordCount = u64;

/// Unit of ledger currency used for kitty prices.
pub type Balance = u128;

/// Identifier of a kitty within the ledger's contiguous id space.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct KittyId(pub u32);

impl fmt::Display for KittyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for KittyId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Build the identifier list `0..count`.
///
/// The list is regenerated deterministically whenever the record count
/// changes; its length always equals the count at generation time.
pub fn id_range(count: RecordCount) -> Vec<KittyId> {
    let upper = u32::try_from(count).unwrap_or(u32::MAX);
    (0..upper).map(KittyId).collect()
}

/// A kitty's immutable genetic payload as stored on the ledger.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dna(pub [u8; DNA_BYTES]);

impl Dna {
    /// Access the raw DNA bytes.
    pub fn bytes(&self) -> &[u8; DNA_BYTES] {
        &self.0
    }
}

impl fmt::Display for Dna {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Dna {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dna({self})")
    }
}

/// Printable ledger account address (SS58-style), opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Wrap a printable address.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(address: &str) -> Self {
        Self(address.to_owned())
    }
}

/// Merged, presentation-ready snapshot of one kitty.
///
/// Views are ephemeral: each merge pass produces a fresh sequence and the
/// previous one is discarded. `price` is strictly optional — absence means
/// "not for sale" and is never coerced to zero; `Some(0)` is a legal listed
/// price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KittyView {
    /// Ledger identifier of the kitty.
    pub id: KittyId,
    /// Genetic payload, also the avatar seed.
    pub dna: Dna,
    /// Current owner's address.
    pub owner: AccountId,
    /// Whether the viewer's own address matches `owner`.
    pub is_owned: bool,
    /// Listed sale price, if the kitty is for sale.
    pub price: Option<Balance>,
}

impl KittyView {
    /// Whether the kitty is currently listed for sale.
    pub fn for_sale(&self) -> bool {
        self.price.is_some()
    }

    /// Whether the viewer may buy this kitty: for sale and not already owned.
    pub fn can_buy(&self) -> bool {
        !self.is_owned && self.for_sale()
    }
}
