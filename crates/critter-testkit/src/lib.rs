//! # Critter Testkit
//!
//! A scripted, fully in-memory [`MockLedger`] implementing the ledger
//! capability traits, plus small helpers shared across critter test suites.
//!
//! The mock never pushes on its own: tests drive it explicitly with
//! [`MockLedger::push_count`], the `push_*` field helpers, and
//! [`MockLedger::emit_phase`], so every test controls exactly which
//! subscription sees what, in which order. Open/cancel accounting is built
//! in so tests can assert the balanced-release property directly.

#![warn(missing_docs)]

mod ledger;
mod util;

pub use ledger::MockLedger;
pub use util::{dna, signer, wait_for};
