//! Shared test utilities for `BursarBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating roster, ledger and invoice rows with sensible defaults.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::{
    core::{
        invoice, roster, transaction,
        validation::{NewInvoice, NewTransaction},
    },
    entities::{
        self,
        transaction::{TransactionStatus, TransactionType},
    },
    errors::Result,
};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DatabaseConnection};

/// Payment date used when a test does not care about dates.
pub const DEFAULT_TEST_DATE: &str = "2026-01-15";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Parses a `YYYY-MM-DD` literal.
///
/// # Panics
/// Panics if `raw` is not a valid date.
pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("test date literal")
}

/// Creates a class level whose name equals its id.
pub async fn create_test_class_level<C>(
    db: &C,
    id: &str,
) -> Result<entities::class_level::Model>
where
    C: ConnectionTrait,
{
    roster::create_class_level(db, id, id).await
}

/// Creates an active student in an existing class level.
///
/// # Defaults
/// * `first_name`: `"Test"`
/// * `last_name`: `"Student {id}"`
pub async fn create_test_student<C>(
    db: &C,
    id: &str,
    class_level_id: &str,
) -> Result<entities::student::Model>
where
    C: ConnectionTrait,
{
    roster::create_student(db, id, "Test", &format!("Student {id}"), class_level_id, true).await
}

/// Creates a bursar with the given Discord id.
pub async fn create_test_staff<C>(
    db: &C,
    id: &str,
) -> Result<entities::staff::Model>
where
    C: ConnectionTrait,
{
    roster::create_staff(db, id, "Test Bursar", "bursar").await
}

/// Creates a fee structure with a whole-number amount.
pub async fn create_test_fee_structure<C>(
    db: &C,
    id: &str,
    class_level_id: &str,
    amount: i64,
) -> Result<entities::fee_structure::Model>
where
    C: ConnectionTrait,
{
    roster::create_fee_structure(
        db,
        id,
        &format!("Fees {id}"),
        class_level_id,
        Decimal::from(amount),
        Some("2026".to_string()),
    )
    .await
}

/// Records a transaction dated [`DEFAULT_TEST_DATE`].
pub async fn create_test_transaction<C>(
    db: &C,
    student_id: &str,
    kind: TransactionType,
    amount: i64,
    status: TransactionStatus,
) -> Result<entities::transaction::Model>
where
    C: ConnectionTrait,
{
    create_dated_transaction(db, student_id, kind, amount, status, DEFAULT_TEST_DATE).await
}

/// Records a transaction with an explicit payment date.
pub async fn create_dated_transaction<C>(
    db: &C,
    student_id: &str,
    kind: TransactionType,
    amount: i64,
    status: TransactionStatus,
    payment_date: &str,
) -> Result<entities::transaction::Model>
where
    C: ConnectionTrait,
{
    transaction::create_transaction(
        db,
        &NewTransaction {
            student_id: student_id.to_string(),
            amount: Decimal::from(amount),
            transaction_type: kind.as_str().to_string(),
            status: status.as_str().to_string(),
            payment_date: Some(payment_date.to_string()),
            description: None,
            created_by_staff_id: None,
        },
    )
    .await
}

/// Creates a pending invoice with an explicit amount and no fee structure.
pub async fn create_test_invoice<C>(
    db: &C,
    student_id: &str,
    amount: i64,
    due_date: &str,
) -> Result<entities::invoice::Model>
where
    C: ConnectionTrait,
{
    invoice::create_invoice(
        db,
        &NewInvoice {
            student_id: student_id.to_string(),
            fee_structure_id: None,
            amount: Some(Decimal::from(amount)),
            due_date: due_date.to_string(),
        },
    )
    .await
}

/// Sets up a database with class level `grade-7` and active student `STU-001`.
/// Returns (db, student) for common test scenarios.
pub async fn setup_with_student() -> Result<(DatabaseConnection, entities::student::Model)> {
    let db = setup_test_db().await?;
    create_test_class_level(&db, "grade-7").await?;
    let student = create_test_student(&db, "STU-001", "grade-7").await?;
    Ok((db, student))
}

/// Builds an unsaved transaction row for pure calculations.
pub fn model(
    kind: TransactionType,
    amount: i64,
    status: TransactionStatus,
) -> entities::transaction::Model {
    entities::transaction::Model {
        id: 0,
        student_id: "STU-001".to_string(),
        amount: Decimal::from(amount),
        transaction_type: kind.as_str().to_string(),
        status: status.as_str().to_string(),
        payment_date: date(DEFAULT_TEST_DATE),
        description: None,
        created_by_staff_id: None,
        created_at: Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap(),
    }
}
