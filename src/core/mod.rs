//! Core business logic for the school ledger.
//!
//! Everything in here is independent of Discord. Functions take a database
//! connection and plain inputs, and return typed rows or [`crate::errors::Error`].

/// Outstanding balance calculation
pub mod balance;
/// Invoice lifecycle: creation, bulk generation, status changes and the overdue sweep
pub mod invoice;
/// Student statements and text formatting
pub mod report;
/// Class levels, staff, students and fee structures
pub mod roster;
/// Period summaries of collected, pending and fine amounts
pub mod summary;
/// Transaction store
pub mod transaction;
/// Input validation shared by the operations above
pub mod validation;
