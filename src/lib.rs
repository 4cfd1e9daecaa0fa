//! VoteVision - poll store, vote ledger and ranking engine
//!
//! This crate owns poll and vote state for the VoteVision polling
//! application: creating polls, recording one vote per poll for the local
//! voter, persisting both through a key/value port, and ranking polls into
//! the trending, top, latest and featured views.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
