//! Call-descriptor constructors for the four user actions.
//!
//! Parameter order matches the pallet's declared order, and address-typed
//! parameters are flagged so pre-flight validation can refuse empty ones
//! before anything reaches the ledger.

use critter_core::{AccountId, Balance, KittyCall, KittyId, RequestDescriptor};

/// Mint a new kitty for the signer.
pub fn create() -> RequestDescriptor {
    RequestDescriptor::new(KittyCall::Create)
}

/// Transfer `id` to `target`.
pub fn transfer(target: &AccountId, id: KittyId) -> RequestDescriptor {
    RequestDescriptor::new(KittyCall::Transfer)
        .with_address(target.as_str())
        .with_plain(id)
}

/// List `id` for sale at `price`.
pub fn set_price(id: KittyId, price: Balance) -> RequestDescriptor {
    RequestDescriptor::new(KittyCall::Ask)
        .with_plain(id)
        .with_plain(price)
}

/// Buy `id` at its listed `price`.
pub fn buy(id: KittyId, price: Balance) -> RequestDescriptor {
    RequestDescriptor::new(KittyCall::Buy)
        .with_plain(id)
        .with_plain(price)
}
