//! Report generation business logic.
//!
//! This module builds student statements and renders ledger data as text. All
//! functions are framework-agnostic and return structured data or plain
//! strings that the bot layer wraps in messages.

use crate::{
    core::{balance, invoice as invoices, roster, summary::LedgerSummary, transaction as ledger},
    entities::{invoice, student, transaction},
    errors::{Error, Result},
};
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::ConnectionTrait;

/// Default number of transactions shown on a statement.
pub const DEFAULT_STATEMENT_LIMIT: usize = 10;

/// Everything the finance office wants to see about one student.
#[derive(Debug, Clone)]
pub struct StudentStatement {
    /// The student being reported on
    pub student: student::Model,
    /// Outstanding balance from completed transactions
    pub outstanding_balance: Decimal,
    /// Most recent transactions, newest payment first
    pub recent_transactions: Vec<transaction::Model>,
    /// Invoices that are not yet paid, earliest due first
    pub open_invoices: Vec<invoice::Model>,
    /// Sum of the open invoices
    pub amount_invoiced_open: Decimal,
}

/// Generates a statement for one student.
///
/// # Arguments
/// * `db` - Database connection
/// * `student_id` - Student to report on
/// * `transaction_limit` - Maximum number of recent transactions to include (default 10)
pub async fn generate_student_statement<C>(
    db: &C,
    student_id: &str,
    transaction_limit: Option<usize>,
) -> Result<StudentStatement>
where
    C: ConnectionTrait,
{
    let student = roster::get_student_by_id(db, student_id)
        .await?
        .ok_or_else(|| Error::StudentNotFound {
            id: student_id.to_string(),
        })?;

    let outstanding_balance = balance::get_outstanding_balance(db, student_id).await?;

    let limit = transaction_limit.unwrap_or(DEFAULT_STATEMENT_LIMIT);
    let recent_transactions: Vec<transaction::Model> =
        ledger::get_transactions_for_student(db, student_id)
            .await?
            .into_iter()
            .take(limit)
            .collect();

    let open_invoices: Vec<invoice::Model> = invoices::get_invoices_for_student(db, student_id)
        .await?
        .into_iter()
        .filter(|i| i.status != invoice::InvoiceStatus::Paid.as_str())
        .collect();
    let amount_invoiced_open = open_invoices.iter().map(|i| i.amount).sum();

    Ok(StudentStatement {
        student,
        outstanding_balance,
        recent_transactions,
        open_invoices,
        amount_invoiced_open,
    })
}

/// Formats a money amount with two decimals, rounding half away from zero.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Formats a transaction amount with the sign it has on the balance.
///
/// Returns strings like `"+100.00"` for fee payments and fines or `"-10.00"`
/// for refunds.
#[must_use]
pub fn format_signed_amount(transaction: &transaction::Model) -> String {
    let effect = balance::balance_effect(transaction);
    // Pending rows have no effect yet; show them with the sign they will take
    let sign = if effect < Decimal::ZERO
        || (effect.is_zero()
            && transaction.kind() == Some(transaction::TransactionType::Refund))
    {
        "-"
    } else {
        "+"
    };
    format!("{sign}{}", format_amount(transaction.amount))
}

/// Generates a summary line for a transaction.
#[must_use]
pub fn format_transaction_summary(transaction: &transaction::Model) -> String {
    let amount = format_signed_amount(transaction);
    let date = transaction.payment_date;
    let kind = &transaction.transaction_type;
    let status = &transaction.status;

    match &transaction.description {
        Some(desc) => format!("#{} | {date} | {amount} | {kind} ({status}) | {desc}", transaction.id),
        None => format!("#{} | {date} | {amount} | {kind} ({status})", transaction.id),
    }
}

/// Generates a summary line for an invoice.
#[must_use]
pub fn format_invoice_summary(invoice: &invoice::Model) -> String {
    let fee = invoice
        .fee_structure_id
        .as_deref()
        .map_or_else(String::new, |id| format!(" | {id}"));
    format!(
        "#{} | {} | {} | due {} | {}{fee}",
        invoice.id,
        invoice.student_id,
        format_amount(invoice.amount),
        invoice.due_date,
        invoice.status
    )
}

/// Renders a period summary as three labelled lines.
#[must_use]
pub fn format_ledger_summary(summary: &LedgerSummary) -> String {
    format!(
        "Collected: {}\nPending: {}\nFines: {}",
        format_amount(summary.total_collected),
        format_amount(summary.total_pending),
        format_amount(summary.total_fines)
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::transaction::{TransactionStatus, TransactionType};
    use crate::test_utils::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::from(1500)), "1500.00");
        assert_eq!(format_amount(Decimal::new(12345, 3)), "12.35");
        assert_eq!(format_amount(Decimal::from(-40)), "-40.00");
    }

    #[test]
    fn test_format_signed_amount() {
        let payment = model(TransactionType::FeePayment, 100, TransactionStatus::Completed);
        let refund = model(TransactionType::Refund, 10, TransactionStatus::Completed);
        let pending_refund = model(TransactionType::Refund, 10, TransactionStatus::Pending);

        assert_eq!(format_signed_amount(&payment), "+100.00");
        assert_eq!(format_signed_amount(&refund), "-10.00");
        assert_eq!(format_signed_amount(&pending_refund), "-10.00");
    }

    #[test]
    fn test_format_transaction_summary() {
        let mut fine = model(TransactionType::Fine, 20, TransactionStatus::Completed);
        fine.id = 7;
        assert_eq!(
            format_transaction_summary(&fine),
            "#7 | 2026-01-15 | +20.00 | fine (completed)"
        );

        fine.description = Some("Late library book".to_string());
        assert_eq!(
            format_transaction_summary(&fine),
            "#7 | 2026-01-15 | +20.00 | fine (completed) | Late library book"
        );
    }

    #[test]
    fn test_format_ledger_summary() {
        let summary = LedgerSummary {
            total_collected: Decimal::from(100),
            total_pending: Decimal::from(50),
            total_fines: Decimal::from(20),
        };
        assert_eq!(
            format_ledger_summary(&summary),
            "Collected: 100.00\nPending: 50.00\nFines: 20.00"
        );
    }

    #[tokio::test]
    async fn test_generate_student_statement_integration() -> Result<()> {
        let (db, student) = setup_with_student().await?;
        for (kind, amount, status) in [
            (TransactionType::FeePayment, 100, TransactionStatus::Completed),
            (TransactionType::Fine, 20, TransactionStatus::Completed),
            (TransactionType::Refund, 10, TransactionStatus::Completed),
            (TransactionType::FeePayment, 50, TransactionStatus::Pending),
        ] {
            create_test_transaction(&db, &student.id, kind, amount, status).await?;
        }
        let open = create_test_invoice(&db, &student.id, 1500, "2026-02-01").await?;
        let paid = create_test_invoice(&db, &student.id, 300, "2026-01-01").await?;
        crate::core::invoice::update_invoice(
            &db,
            paid.id,
            &crate::core::validation::InvoiceUpdate {
                status: Some("PAID".to_string()),
                ..Default::default()
            },
        )
        .await?;

        let statement = generate_student_statement(&db, &student.id, Some(3)).await?;

        assert_eq!(statement.student.id, student.id);
        assert_eq!(statement.outstanding_balance, Decimal::from(110));
        assert_eq!(statement.recent_transactions.len(), 3);
        assert_eq!(statement.open_invoices.len(), 1);
        assert_eq!(statement.open_invoices[0].id, open.id);
        assert_eq!(statement.amount_invoiced_open, Decimal::from(1500));
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_student_statement_in_transaction() -> Result<()> {
        use sea_orm::TransactionTrait;

        let (db, student) = setup_with_student().await?;
        let txn = db.begin().await?;
        create_test_transaction(
            &txn,
            &student.id,
            TransactionType::Fine,
            20,
            TransactionStatus::Completed,
        )
        .await?;

        let statement = generate_student_statement(&txn, &student.id, None).await?;
        assert_eq!(statement.outstanding_balance, Decimal::from(20));
        assert_eq!(statement.recent_transactions.len(), 1);
        txn.rollback().await?;

        let statement = generate_student_statement(&db, &student.id, None).await?;
        assert!(statement.recent_transactions.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_student_statement_unknown_student() -> Result<()> {
        let db = setup_test_db().await?;
        let result = generate_student_statement(&db, "STU-404", None).await;
        assert!(matches!(result, Err(Error::StudentNotFound { .. })));
        Ok(())
    }
}
