//! # tandem-sync
//!
//! Reconciliation engine between local git working copies and GitHub.
//!
//! The pure stages ([`merge_inventories`], [`classify_status`],
//! [`derive_remote_set`], [`filter_complete`], [`plan_pair`]) can be composed
//! on their own. [`Converger`] drives pairs to a terminal state through the
//! collaborator traits and a [`Decider`]; [`Converger::run`] is the whole
//! pipeline.

pub mod converge;
pub mod decision;
pub mod error;
pub mod filter;
pub mod merge;
pub mod meta;
pub mod pipeline;
pub mod plan;
pub mod remotes;
pub mod status;

pub use converge::{Convergence, Converger, Terminal};
pub use decision::{Answer, Choice, Decider};
pub use error::SyncError;
pub use filter::{exclude_ineligible, filter_complete, Excluded};
pub use merge::{canonical_name, merge_inventories, PairMap};
pub use meta::meta_update;
pub use pipeline::{load_inventories, Outcome, PairFailure, ReconcileReport};
pub use plan::{plan_pair, PlannedAction};
pub use remotes::derive_remote_set;
pub use status::{classify_status, StatusTag};
