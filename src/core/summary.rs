//! Period summaries across the whole ledger.
//!
//! A summary splits the transactions of a payment-date window into three
//! independent totals. A completed fee payment counts as collected, a completed
//! fine counts as a fine, and anything pending counts as pending whatever its
//! type. Refunds only ever show up in the pending total.

use crate::{
    core::{transaction::get_transactions_between, validation::validate_date_range},
    entities::transaction::{self, TransactionType},
    errors::Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::ConnectionTrait;
use serde::Serialize;

/// Totals for one reporting window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    /// Completed fee payments
    pub total_collected: Decimal,
    /// Pending transactions of any type
    pub total_pending: Decimal,
    /// Completed fines
    pub total_fines: Decimal,
}

impl LedgerSummary {
    /// Adds one transaction to the running totals.
    pub fn record(&mut self, transaction: &transaction::Model) {
        if transaction.is_pending() {
            self.total_pending += transaction.amount;
            return;
        }

        if transaction.is_completed() {
            match transaction.kind() {
                Some(TransactionType::FeePayment) => self.total_collected += transaction.amount,
                Some(TransactionType::Fine) => self.total_fines += transaction.amount,
                Some(TransactionType::Refund) | None => {}
            }
        }
    }
}

/// Reduces a set of transactions into a [`LedgerSummary`].
pub fn summarize<'a, I>(transactions: I) -> LedgerSummary
where
    I: IntoIterator<Item = &'a transaction::Model>,
{
    transactions
        .into_iter()
        .fold(LedgerSummary::default(), |mut summary, tx| {
            summary.record(tx);
            summary
        })
}

/// Summarizes every transaction whose payment date falls in `[start, end]`.
///
/// Either bound may be omitted to leave that side open.
///
/// # Errors
/// Returns a validation error when `start` is after `end`, and store errors
/// unchanged.
pub async fn get_summary<C>(
    db: &C,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<LedgerSummary>
where
    C: ConnectionTrait,
{
    validate_date_range(start, end)?;

    let transactions = get_transactions_between(db, start, end).await?;
    let summary = summarize(&transactions);
    tracing::debug!(
        "Summary for {start:?}..={end:?} over {} transactions: {summary:?}",
        transactions.len()
    );
    Ok(summary)
}
