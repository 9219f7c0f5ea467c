//! `BursarBuddy` - A Discord bot for a school's fee ledger
//!
//! This crate records fee payments, fines and refunds per student, derives
//! outstanding balances and period summaries from them, and manages the
//! invoice lifecycle from bulk generation through payment or overdue status.

#![deny(
    unsafe_code,
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    clippy::pedantic,
    clippy::nursery,
    // Ledger and invoice paths return `Error` instead of panicking
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
)]
#![allow(
    clippy::module_name_repetitions,
    // Failure modes are the `Error` variants
    clippy::missing_errors_doc,
)]

/// Discord bot interface - commands, handlers, and bot context
pub mod bot;
/// Configuration management for the database and the school roster
pub mod config;
/// Core business logic - framework-agnostic ledger, invoice, and reporting operations
pub mod core;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;

#[cfg(test)]
pub mod test_utils;
