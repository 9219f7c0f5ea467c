//! Outstanding balance calculation.
//!
//! A student's balance is recomputed from their completed transactions on
//! every call: fee payments and fines add to it, refunds subtract from it.
//! Pending transactions, and any type or status this crate does not know, have
//! no effect.

use crate::{
    core::transaction::get_completed_transactions_for_student,
    entities::transaction::{self, TransactionType},
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::ConnectionTrait;

/// Contribution of a single transaction to the outstanding balance.
#[must_use]
pub fn balance_effect(transaction: &transaction::Model) -> Decimal {
    if !transaction.is_completed() {
        return Decimal::ZERO;
    }

    match transaction.kind() {
        Some(TransactionType::FeePayment | TransactionType::Fine) => transaction.amount,
        Some(TransactionType::Refund) => -transaction.amount,
        None => Decimal::ZERO,
    }
}

/// Folds a set of transactions into an outstanding balance. Empty input is zero.
pub fn outstanding_balance<'a, I>(transactions: I) -> Decimal
where
    I: IntoIterator<Item = &'a transaction::Model>,
{
    transactions
        .into_iter()
        .fold(Decimal::ZERO, |balance, tx| balance + balance_effect(tx))
}

/// Computes a student's outstanding balance from their completed transactions.
///
/// Unknown students simply have no transactions and therefore a zero balance.
pub async fn get_outstanding_balance<C>(db: &C, student_id: &str) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let completed = get_completed_transactions_for_student(db, student_id).await?;
    let balance = outstanding_balance(&completed);
    tracing::debug!(
        "Outstanding balance for {student_id}: {balance} over {} completed transactions",
        completed.len()
    );
    Ok(balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::transaction::TransactionStatus;
    use crate::test_utils::*;

    #[test]
    fn test_empty_set_is_zero() {
        assert_eq!(outstanding_balance(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_scenario_balance() {
        let txs = [
            model(TransactionType::FeePayment, 100, TransactionStatus::Completed),
            model(TransactionType::Fine, 20, TransactionStatus::Completed),
            model(TransactionType::Refund, 10, TransactionStatus::Completed),
            model(TransactionType::FeePayment, 50, TransactionStatus::Pending),
        ];
        assert_eq!(outstanding_balance(&txs), Decimal::from(110));
    }

    #[test]
    fn test_pending_transactions_never_change_balance() {
        let completed = vec![
            model(TransactionType::FeePayment, 300, TransactionStatus::Completed),
            model(TransactionType::Refund, 45, TransactionStatus::Completed),
        ];
        let base = outstanding_balance(&completed);

        for kind in TransactionType::ALL {
            let mut with_pending = completed.clone();
            with_pending.push(model(kind, 999, TransactionStatus::Pending));
            assert_eq!(outstanding_balance(&with_pending), base);
        }
    }

    #[test]
    fn test_balance_matches_sum_by_type() {
        let txs = [
            model(TransactionType::FeePayment, 120, TransactionStatus::Completed),
            model(TransactionType::FeePayment, 80, TransactionStatus::Completed),
            model(TransactionType::Fine, 15, TransactionStatus::Completed),
            model(TransactionType::Refund, 30, TransactionStatus::Completed),
            model(TransactionType::Refund, 5, TransactionStatus::Completed),
        ];
        let sum = |kind: TransactionType| -> Decimal {
            txs.iter()
                .filter(|t| t.kind() == Some(kind))
                .map(|t| t.amount)
                .sum()
        };

        assert_eq!(
            outstanding_balance(&txs),
            sum(TransactionType::FeePayment) + sum(TransactionType::Fine)
                - sum(TransactionType::Refund)
        );
    }

    #[test]
    fn test_unknown_values_are_ignored() {
        let mut odd_type = model(TransactionType::Fine, 10, TransactionStatus::Completed);
        odd_type.transaction_type = "donation".to_string();
        let mut odd_status = model(TransactionType::Fine, 10, TransactionStatus::Completed);
        odd_status.status = "reversed".to_string();

        assert_eq!(outstanding_balance(&[odd_type, odd_status]), Decimal::ZERO);
    }

    #[test]
    fn test_refunds_can_make_balance_negative() {
        let txs = [model(TransactionType::Refund, 40, TransactionStatus::Completed)];
        assert_eq!(outstanding_balance(&txs), Decimal::from(-40));
    }

    #[tokio::test]
    async fn test_get_outstanding_balance_integration() -> Result<()> {
        let (db, student) = setup_with_student().await?;
        for (kind, amount, status) in [
            (TransactionType::FeePayment, 100, TransactionStatus::Completed),
            (TransactionType::Fine, 20, TransactionStatus::Completed),
            (TransactionType::Refund, 10, TransactionStatus::Completed),
            (TransactionType::FeePayment, 50, TransactionStatus::Pending),
        ] {
            create_test_transaction(&db, &student.id, kind, amount, status).await?;
        }

        assert_eq!(
            get_outstanding_balance(&db, &student.id).await?,
            Decimal::from(110)
        );
        assert_eq!(
            get_outstanding_balance(&db, "STU-404").await?,
            Decimal::ZERO
        );
        Ok(())
    }
}
