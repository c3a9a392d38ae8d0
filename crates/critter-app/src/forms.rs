//! Transient per-action form state.
//!
//! Each modal action holds its staged input in one of these value holders
//! for the duration of the action's UI lifetime, then converts it into a
//! [`RequestDescriptor`] on confirmation. Whatever the user typed is carried
//! verbatim; validation happens in the request lifecycle.

use critter_core::{Balance, KittyCall, KittyId, KittyView, RequestDescriptor};

/// Staged input for the transfer modal.
#[derive(Debug, Clone, Default)]
pub struct TransferForm {
    /// Recipient address as typed.
    pub target: String,
}

impl TransferForm {
    /// Empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the staged recipient.
    pub fn set_target(&mut self, target: impl Into<String>) {
        self.target = target.into();
    }

    /// Descriptor for transferring `id` to the staged recipient.
    pub fn descriptor(&self, id: KittyId) -> RequestDescriptor {
        RequestDescriptor::new(KittyCall::Transfer)
            .with_address(self.target.clone())
            .with_plain(id)
    }
}

/// Staged input for the set-price modal.
#[derive(Debug, Clone, Default)]
pub struct AskForm {
    /// Asking price as typed.
    pub price: String,
}

impl AskForm {
    /// Empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the staged price.
    pub fn set_price(&mut self, price: impl Into<String>) {
        self.price = price.into();
    }

    /// Descriptor listing `id` at the staged price.
    pub fn descriptor(&self, id: KittyId) -> RequestDescriptor {
        RequestDescriptor::new(KittyCall::Ask)
            .with_plain(id)
            .with_plain(&self.price)
    }
}

/// Read-only confirmation state for the buy modal.
///
/// Can only be constructed for a kitty that is actually buyable, so a
/// presentation layer cannot offer the action for an unlisted or self-owned
/// kitty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyConfirm {
    id: KittyId,
    price: Balance,
}

impl BuyConfirm {
    /// Build the confirmation for `view`, if it is buyable by the viewer.
    pub fn for_view(view: &KittyView) -> Option<Self> {
        match view.price {
            Some(price) if view.can_buy() => Some(Self { id: view.id, price }),
            _ => None,
        }
    }

    /// The listed price being confirmed.
    pub fn price(&self) -> Balance {
        self.price
    }

    /// Descriptor buying the kitty at the confirmed price.
    pub fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor::new(KittyCall::Buy)
            .with_plain(self.id)
            .with_plain(self.price)
    }
}
