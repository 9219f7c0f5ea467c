//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// General utility commands
pub mod general;

/// Invoice management commands
pub mod invoice;

/// Ledger commands: recording transactions, balances and summaries
pub mod ledger;

// Export commands
pub use general::*;
pub use invoice::*;
pub use ledger::*;
