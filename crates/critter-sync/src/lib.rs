//! # Critter Sync
//!
//! The chain-reactive view synchronizer: keeps a local, merged view of every
//! kitty on the ledger current against three independently-delivered storage
//! subscriptions, and drives signed state-changing requests through their
//! inclusion lifecycle.
//!
//! # Architecture
//!
//! All reads flow one direction (ledger → watchers → merge → presentation)
//! and all writes flow the other (presentation → lifecycle → ledger), with
//! lifecycle status feeding back into a shared status slot:
//!
//! - [`CountWatcher`] tracks the scalar kitty count.
//! - [`FieldSubscriptionSet`] fans out the three multi-key field
//!   subscriptions (DNA, owner, price) for the current id list and owns
//!   release of stale generations.
//! - [`merge_views`] deterministically folds the latest field snapshots into
//!   an ordered [`KittyView`](critter_core::KittyView) sequence.
//! - [`RequestLifecycle`] validates, submits, and tracks one signed request
//!   to a terminal [`RequestOutcome`](critter_core::RequestOutcome),
//!   releasing its tracking subscription exactly once.
//! - [`SyncController`] glues the above into a single event-loop task and
//!   exposes watch channels for views, count, and the status line.
//!
//! # Concurrency Model
//!
//! Ledger callbacks never touch shared state directly: they forward events
//! into an unbounded channel consumed by the controller's single task, so
//! every snapshot is owned by one writer and replaced wholesale. Pushes from
//! different subscriptions are unordered relative to each other; the merge
//! step is pure, so interleaving cannot produce an inconsistent view.

#![warn(missing_docs)]

pub mod controller;
pub mod count;
pub mod fields;
pub mod lifecycle;
pub mod merge;

pub use controller::{SyncController, SyncPhase};
pub use count::CountWatcher;
pub use fields::{FieldPush, FieldSink, FieldSubscriptionSet};
pub use lifecycle::{RequestLifecycle, StatusSink, SubmitHandle};
pub use merge::merge_views;
