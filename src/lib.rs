//! Habit Pro Core - Entitlements and synchronization for a habit tracker.
//!
//! This crate resolves which product capabilities a user's tier unlocks,
//! keeps a local data store consistent with a remote copy through
//! push/pull/merge, and derives coaching suggestions from habit state.
//! Presentation, payment processing and storage technology are external
//! collaborators plugged in through ports.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
