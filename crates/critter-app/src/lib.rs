//! # Critter App
//!
//! Portable headless application surface for critter frontends. A renderer
//! (terminal, web, mobile) talks only to this crate:
//!
//! - [`KittiesApp`] owns the synchronizer and exposes read-only watch
//!   channels for the merged views, the record count, and the shared status
//!   line, plus one async method per user action.
//! - [`intents`] builds the pallet call descriptors, with parameter order
//!   and address flags exactly as the chain expects them.
//! - [`forms`] holds transient, per-action input state (the modal form
//!   values) with no bearing on core correctness.
//!
//! The ledger client and signer are injected at construction; nothing here
//! reads ambient global state.

#![warn(missing_docs)]

pub mod app;
pub mod forms;
pub mod intents;

pub use app::KittiesApp;
pub use forms::{AskForm, BuyConfirm, TransferForm};
