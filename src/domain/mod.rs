//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `poll` - Poll aggregate, creation rules, results and demo seed
//! - `ledger` - The local voter's one-vote-per-poll record
//! - `ranking` - Pure category orderings over polls

pub mod foundation;
pub mod ledger;
pub mod poll;
pub mod ranking;
