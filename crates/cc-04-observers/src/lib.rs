//! # cc-04-observers
//!
//! Observation stage of the pipeline. Observers turn validated notifications
//! into cache changes.
//!
//! ```text
//!   Commit:   n1 ──► n2 ──► n3        observers in registration order
//!   Rollback: n3' ──► n2' ──► n1'     observers in reverse order,
//!                                     notifications replayed from undo record
//! ```
//!
//! ## Contract
//!
//! - An observer never rejects for business reasons; validators already did.
//!   [`ObserverError`] means a validator let something through that it
//!   should not have, and aborts the block.
//! - Receipts are recorded on Commit only.
//! - Account removals requested during Rollback are queued and applied by
//!   [`ObserverState::commit_removals`] once the whole block is undone.
//! - Observers that delete state on Commit stash the deleted entries in
//!   [`UndoStash`] and restore them on Rollback.

pub mod aggregate;
pub mod context;
pub mod core;
pub mod errors;
pub mod observer;
pub mod utils;

pub use aggregate::{AggregateNotificationObserver, DemuxObserverBuilder};
pub use context::{ObserverContext, ObserverState, UndoStash};
pub use errors::ObserverError;
pub use observer::{observer, FunctionalObserver, NotificationObserver, NotifyMode};
