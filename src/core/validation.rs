//! Input validation for ledger and invoice operations.
//!
//! Every mutating operation takes a raw input struct, runs it through one of the
//! `validate_*` functions here, and only touches the database with the typed
//! result. Validation collects every field problem instead of stopping at the
//! first one, so a caller can report them all at once.

use crate::entities::{
    invoice::InvoiceStatus,
    transaction::{TransactionStatus, TransactionType},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::{fmt, str::FromStr};

/// Date format accepted for every date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the offending input field
    pub field: &'static str,
    /// What is wrong with it
    pub message: String,
}

/// All field errors found while validating one input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Creates an empty error set.
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Creates an error set holding one field error.
    #[must_use]
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Records an error against `field`.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Whether no errors were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The recorded errors, in the order they were found.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether `field` has at least one error.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Returns `value` when no errors were recorded, otherwise the errors.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

/// Raw input for recording a transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Student to post the transaction to
    pub student_id: String,
    /// Amount, must be positive
    pub amount: Decimal,
    /// One of `fee_payment`, `fine`, `refund`
    pub transaction_type: String,
    /// One of `pending`, `completed`
    pub status: String,
    /// `YYYY-MM-DD`; defaults to today when absent
    pub payment_date: Option<String>,
    /// Optional note
    pub description: Option<String>,
    /// Acting staff identity
    pub created_by_staff_id: Option<String>,
}

/// A transaction that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    /// Trimmed student identifier
    pub student_id: String,
    /// Positive amount
    pub amount: Decimal,
    /// Parsed type
    pub transaction_type: TransactionType,
    /// Parsed status
    pub status: TransactionStatus,
    /// Parsed payment date, if one was given
    pub payment_date: Option<NaiveDate>,
    /// Note with surrounding whitespace removed; empty notes become `None`
    pub description: Option<String>,
    /// Acting staff identity
    pub created_by_staff_id: Option<String>,
}

/// Raw input for bulk invoice generation.
#[derive(Debug, Clone)]
pub struct BulkInvoiceRequest {
    /// Class level whose students are billed
    pub class_level_id: String,
    /// Fee structure supplying the amount
    pub fee_structure_id: String,
    /// `YYYY-MM-DD`
    pub due_date: String,
}

/// A bulk invoice request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkInvoicePlan {
    /// Trimmed class level identifier
    pub class_level_id: String,
    /// Trimmed fee structure identifier
    pub fee_structure_id: String,
    /// Parsed due date
    pub due_date: NaiveDate,
}

/// Raw input for creating a single invoice.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    /// Student being billed
    pub student_id: String,
    /// Fee structure to bill against, if any
    pub fee_structure_id: Option<String>,
    /// Explicit amount; falls back to the fee structure's amount when absent
    pub amount: Option<Decimal>,
    /// `YYYY-MM-DD`
    pub due_date: String,
}

/// A single invoice that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    /// Trimmed student identifier
    pub student_id: String,
    /// Trimmed fee structure identifier
    pub fee_structure_id: Option<String>,
    /// Explicit amount, non-negative
    pub amount: Option<Decimal>,
    /// Parsed due date
    pub due_date: NaiveDate,
}

/// Raw input for editing an invoice. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct InvoiceUpdate {
    /// New amount
    pub amount: Option<Decimal>,
    /// New due date, `YYYY-MM-DD`
    pub due_date: Option<String>,
    /// New status name
    pub status: Option<String>,
}

/// Invoice edits that passed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceChanges {
    /// New amount, non-negative
    pub amount: Option<Decimal>,
    /// New due date
    pub due_date: Option<NaiveDate>,
    /// New status
    pub status: Option<InvoiceStatus>,
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, FieldError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| FieldError {
        field,
        message: format!("'{}' is not a valid date (expected YYYY-MM-DD)", raw.trim()),
    })
}

/// Parses a decimal amount typed by a user (e.g., `"150"`, `"99.50"`).
pub fn parse_amount(field: &'static str, raw: &str) -> Result<Decimal, ValidationErrors> {
    Decimal::from_str(raw.trim())
        .map_err(|_| ValidationErrors::single(field, format!("'{}' is not a number", raw.trim())))
}

fn require_id(errors: &mut ValidationErrors, field: &'static str, raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.add(field, "is required");
    }
    trimmed.to_string()
}

fn parse_into<T: FromStr<Err = String>>(
    errors: &mut ValidationErrors,
    field: &'static str,
    raw: &str,
) -> Option<T> {
    raw.parse::<T>()
        .map_err(|message| errors.add(field, message))
        .ok()
}

fn date_into(errors: &mut ValidationErrors, field: &'static str, raw: &str) -> Option<NaiveDate> {
    parse_date(field, raw)
        .map_err(|e| errors.add(e.field, e.message))
        .ok()
}

/// Validates a transaction before it is inserted.
///
/// # Errors
/// Returns every field problem: empty `student_id`, non-positive amount,
/// unknown type or status, malformed payment date.
pub fn validate_new_transaction(
    input: &NewTransaction,
) -> Result<TransactionDraft, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let student_id = require_id(&mut errors, "student_id", &input.student_id);

    if input.amount <= Decimal::ZERO {
        errors.add("amount", "must be greater than zero");
    }

    let transaction_type =
        parse_into::<TransactionType>(&mut errors, "transaction_type", &input.transaction_type);
    let status = parse_into::<TransactionStatus>(&mut errors, "status", &input.status);

    let payment_date = input
        .payment_date
        .as_deref()
        .and_then(|raw| date_into(&mut errors, "payment_date", raw));

    let description = input
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(ToString::to_string);

    let created_by_staff_id = input
        .created_by_staff_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToString::to_string);

    match (transaction_type, status) {
        (Some(transaction_type), Some(status)) => errors.into_result(TransactionDraft {
            student_id,
            amount: input.amount,
            transaction_type,
            status,
            payment_date,
            description,
            created_by_staff_id,
        }),
        _ => Err(errors),
    }
}

/// Validates a bulk invoice generation request.
///
/// # Errors
/// Returns field errors for empty identifiers or a malformed due date.
pub fn validate_bulk_request(
    input: &BulkInvoiceRequest,
) -> Result<BulkInvoicePlan, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let class_level_id = require_id(&mut errors, "class_level_id", &input.class_level_id);
    let fee_structure_id = require_id(&mut errors, "fee_structure_id", &input.fee_structure_id);
    let due_date = date_into(&mut errors, "due_date", &input.due_date);

    match due_date {
        Some(due_date) => errors.into_result(BulkInvoicePlan {
            class_level_id,
            fee_structure_id,
            due_date,
        }),
        None => Err(errors),
    }
}

/// Validates a single invoice before it is inserted.
///
/// # Errors
/// Returns field errors for an empty student, a negative amount, a missing
/// amount without a fee structure to take it from, or a malformed due date.
pub fn validate_new_invoice(input: &NewInvoice) -> Result<InvoiceDraft, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let student_id = require_id(&mut errors, "student_id", &input.student_id);

    let fee_structure_id = input
        .fee_structure_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToString::to_string);

    match input.amount {
        Some(amount) if amount < Decimal::ZERO => {
            errors.add("amount", "cannot be negative");
        }
        None if fee_structure_id.is_none() => {
            errors.add("amount", "is required when no fee structure is given");
        }
        _ => {}
    }

    let due_date = date_into(&mut errors, "due_date", &input.due_date);

    match due_date {
        Some(due_date) => errors.into_result(InvoiceDraft {
            student_id,
            fee_structure_id,
            amount: input.amount,
            due_date,
        }),
        None => Err(errors),
    }
}

/// Validates invoice edits.
///
/// # Errors
/// Returns field errors for a negative amount, a malformed due date, a status
/// outside the four known values, or an update that changes nothing.
pub fn validate_invoice_update(input: &InvoiceUpdate) -> Result<InvoiceChanges, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if input.amount.is_none() && input.due_date.is_none() && input.status.is_none() {
        errors.add("invoice", "no changes supplied");
    }

    if input.amount.is_some_and(|amount| amount < Decimal::ZERO) {
        errors.add("amount", "cannot be negative");
    }

    let due_date = input
        .due_date
        .as_deref()
        .and_then(|raw| date_into(&mut errors, "due_date", raw));
    let status = input
        .status
        .as_deref()
        .and_then(|raw| parse_into::<InvoiceStatus>(&mut errors, "status", raw));

    errors.into_result(InvoiceChanges {
        amount: input.amount,
        due_date,
        status,
    })
}

/// Checks that an inclusive date range is not inverted.
///
/// # Errors
/// Returns a `start_date` error when `start` is after `end`.
pub fn validate_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ValidationErrors> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => Err(ValidationErrors::single(
            "start_date",
            format!("{start} is after end date {end}"),
        )),
        _ => Ok(()),
    }
}
