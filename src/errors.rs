//! Unified error types for `BursarBuddy`.
//!
//! Every fallible operation in the crate returns [`Result`]. Store errors from
//! `SeaORM` are wrapped without modification so callers see the database's
//! own message.

use crate::core::validation::ValidationErrors;
use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected before reaching the store
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Requested invoice status change goes against the lifecycle
    #[error("Invoice status cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// Student does not exist or is inactive
    #[error("Student not found: {id}")]
    StudentNotFound {
        /// Student identifier that was looked up
        id: String,
    },

    /// Class level does not exist
    #[error("Class level not found: {id}")]
    ClassLevelNotFound {
        /// Class level identifier that was looked up
        id: String,
    },

    /// Fee structure does not exist
    #[error("Fee structure not found: {id}")]
    FeeStructureNotFound {
        /// Fee structure identifier that was looked up
        id: String,
    },

    /// Invoice does not exist
    #[error("Invoice not found: {id}")]
    InvoiceNotFound {
        /// Invoice identifier that was looked up
        id: i64,
    },

    /// Student already has an invoice for this fee structure
    #[error("Student {student_id} already has an invoice for fee structure {fee_structure_id}")]
    DuplicateInvoice {
        /// Student being billed
        student_id: String,
        /// Fee structure already billed
        fee_structure_id: String,
    },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Database error, propagated as-is
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Formatting a reply failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl From<ValidationErrors> for Error {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
