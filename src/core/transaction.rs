//! Transaction business logic - the school's ledger store.
//!
//! This module records fee payments, fines and refunds against students and
//! reads them back for history views, balance calculation and period summaries.
//! Transactions are append-only: there is no update path, and a recorded
//! transaction is never rewritten. Store errors are returned exactly as the
//! database reports them; nothing is retried.

use crate::{
    core::{
        roster,
        validation::{NewTransaction, validate_new_transaction},
    },
    entities::{Staff, Student, Transaction, staff, student, transaction},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use std::collections::HashMap;
use tracing::info;

/// A transaction together with the student it is posted to and the staff
/// member who recorded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionWithParties {
    /// The ledger row
    pub transaction: transaction::Model,
    /// Student the transaction belongs to
    pub student: Option<student::Model>,
    /// Staff member who recorded it, if known
    pub staff: Option<staff::Model>,
}

/// Records a new transaction after validating it.
///
/// The payment date defaults to today when the input leaves it out. The
/// student must exist; inactive students can still be charged or refunded.
///
/// # Errors
/// Returns [`Error::Validation`] before any query when the input is malformed,
/// [`Error::StudentNotFound`] for an unknown student, and [`Error::Database`]
/// for store failures.
pub async fn create_transaction<C>(db: &C, input: &NewTransaction) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    let draft = validate_new_transaction(input)?;

    if roster::get_student_by_id(db, &draft.student_id).await?.is_none() {
        return Err(Error::StudentNotFound {
            id: draft.student_id,
        });
    }

    let now = Utc::now();
    let model = transaction::ActiveModel {
        student_id: Set(draft.student_id),
        amount: Set(draft.amount),
        transaction_type: Set(draft.transaction_type.as_str().to_string()),
        status: Set(draft.status.as_str().to_string()),
        payment_date: Set(draft.payment_date.unwrap_or_else(|| now.date_naive())),
        description: Set(draft.description),
        created_by_staff_id: Set(draft.created_by_staff_id),
        created_at: Set(now),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    info!(
        "Recorded {} {} of {} for student {} (transaction {})",
        created.status, created.transaction_type, created.amount, created.student_id, created.id
    );
    Ok(created)
}

/// Retrieves every transaction with its student and recording staff member,
/// newest first by creation time.
pub async fn get_all_transactions<C>(db: &C) -> Result<Vec<TransactionWithParties>>
where
    C: ConnectionTrait,
{
    let rows = Transaction::find()
        .find_also_related(Student)
        .order_by_desc(transaction::Column::CreatedAt)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await?;

    let mut staff_ids: Vec<String> = rows
        .iter()
        .filter_map(|(tx, _)| tx.created_by_staff_id.clone())
        .collect();
    staff_ids.sort_unstable();
    staff_ids.dedup();

    let staff_by_id: HashMap<String, staff::Model> = if staff_ids.is_empty() {
        HashMap::new()
    } else {
        Staff::find()
            .filter(staff::Column::Id.is_in(staff_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect()
    };

    Ok(rows
        .into_iter()
        .map(|(transaction, student)| {
            let staff = transaction
                .created_by_staff_id
                .as_ref()
                .and_then(|id| staff_by_id.get(id))
                .cloned();
            TransactionWithParties {
                transaction,
                student,
                staff,
            }
        })
        .collect())
}

/// Retrieves one student's transactions, newest first by payment date.
pub async fn get_transactions_for_student<C>(
    db: &C,
    student_id: &str,
) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    Transaction::find()
        .filter(transaction::Column::StudentId.eq(student_id))
        .order_by_desc(transaction::Column::PaymentDate)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves one student's completed transactions; the input to balance calculation.
pub async fn get_completed_transactions_for_student<C>(
    db: &C,
    student_id: &str,
) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    Transaction::find()
        .filter(transaction::Column::StudentId.eq(student_id))
        .filter(
            transaction::Column::Status
                .eq(transaction::TransactionStatus::Completed.as_str()),
        )
        .order_by_asc(transaction::Column::PaymentDate)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves transactions whose payment date lies in `[start, end]`.
/// A missing bound leaves that side open.
pub async fn get_transactions_between<C>(
    db: &C,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    let mut query = Transaction::find();
    if let Some(start) = start {
        query = query.filter(transaction::Column::PaymentDate.gte(start));
    }
    if let Some(end) = end {
        query = query.filter(transaction::Column::PaymentDate.lte(end));
    }

    query
        .order_by_asc(transaction::Column::PaymentDate)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific transaction by its unique ID.
pub async fn get_transaction_by_id<C>(
    db: &C,
    transaction_id: i64,
) -> Result<Option<transaction::Model>>
where
    C: ConnectionTrait,
{
    Transaction::find_by_id(transaction_id)
        .one(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::transaction::{TransactionStatus, TransactionType};
    use crate::test_utils::*;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase, TransactionTrait};

    fn fine_for(student_id: &str) -> NewTransaction {
        NewTransaction {
            student_id: student_id.to_string(),
            amount: Decimal::from(20),
            transaction_type: "fine".to_string(),
            status: "completed".to_string(),
            payment_date: Some("2026-01-20".to_string()),
            description: Some("Library book lost".to_string()),
            created_by_staff_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_transaction_validation_runs_before_store() -> Result<()> {
        // No query results configured: any store call would fail differently
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let input = NewTransaction {
            amount: Decimal::ZERO,
            ..fine_for("STU-001")
        };
        let result = create_transaction(&db, &input).await;
        assert!(matches!(result, Err(Error::Validation(ref e)) if e.has_field("amount")));

        let input = NewTransaction {
            transaction_type: "donation".to_string(),
            ..fine_for("STU-001")
        };
        let result = create_transaction(&db, &input).await;
        assert!(matches!(result, Err(Error::Validation(ref e)) if e.has_field("transaction_type")));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_transaction_student_not_found() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<student::Model>::new()])
            .into_connection();

        let result = create_transaction(&db, &fine_for("STU-404")).await;
        assert!(matches!(result, Err(Error::StudentNotFound { ref id }) if id == "STU-404"));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_transaction_integration() -> Result<()> {
        let (db, student) = setup_with_student().await?;
        create_test_staff(&db, "1001").await?;

        let input = NewTransaction {
            created_by_staff_id: Some("1001".to_string()),
            ..fine_for(&student.id)
        };
        let created = create_transaction(&db, &input).await?;

        assert!(created.id > 0);
        assert_eq!(created.student_id, student.id);
        assert_eq!(created.amount, Decimal::from(20));
        assert_eq!(created.kind(), Some(TransactionType::Fine));
        assert!(created.is_completed());
        assert_eq!(created.payment_date, date("2026-01-20"));
        assert_eq!(created.created_by_staff_id.as_deref(), Some("1001"));

        let stored = get_transaction_by_id(&db, created.id).await?.unwrap();
        assert_eq!(stored, created);
        Ok(())
    }

    #[tokio::test]
    async fn test_payment_date_defaults_to_today() -> Result<()> {
        let (db, student) = setup_with_student().await?;

        let input = NewTransaction {
            payment_date: None,
            ..fine_for(&student.id)
        };
        let before = Utc::now().date_naive();
        let created = create_transaction(&db, &input).await?;
        let after = Utc::now().date_naive();

        assert!(created.payment_date >= before && created.payment_date <= after);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_transactions_for_student_newest_payment_first() -> Result<()> {
        let (db, student) = setup_with_student().await?;
        let other = create_test_student(&db, "STU-002", "grade-7").await?;

        let january = create_dated_transaction(
            &db,
            &student.id,
            TransactionType::FeePayment,
            100,
            TransactionStatus::Completed,
            "2026-01-10",
        )
        .await?;
        let march = create_dated_transaction(
            &db,
            &student.id,
            TransactionType::FeePayment,
            50,
            TransactionStatus::Pending,
            "2026-03-10",
        )
        .await?;
        create_test_transaction(
            &db,
            &other.id,
            TransactionType::Fine,
            5,
            TransactionStatus::Completed,
        )
        .await?;

        let history = get_transactions_for_student(&db, &student.id).await?;
        assert_eq!(history, vec![march, january]);

        assert!(get_transactions_for_student(&db, "STU-404").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_transactions_joins_student_and_staff() -> Result<()> {
        let (db, student) = setup_with_student().await?;
        create_test_staff(&db, "1001").await?;

        let first = create_transaction(&db, &fine_for(&student.id)).await?;
        let second = create_transaction(
            &db,
            &NewTransaction {
                created_by_staff_id: Some("1001".to_string()),
                ..fine_for(&student.id)
            },
        )
        .await?;

        let all = get_all_transactions(&db).await?;
        assert_eq!(all.len(), 2);

        // Newest first by creation time
        assert_eq!(all[0].transaction.id, second.id);
        assert_eq!(all[1].transaction.id, first.id);

        assert_eq!(all[0].student.as_ref().unwrap().id, student.id);
        assert_eq!(all[0].staff.as_ref().unwrap().id, "1001");
        assert!(all[1].staff.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_reads_see_uncommitted_rows_in_transaction() -> Result<()> {
        let (db, student) = setup_with_student().await?;

        let txn = db.begin().await?;
        let created = create_transaction(&txn, &fine_for(&student.id)).await?;

        let all = get_all_transactions(&txn).await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].student.as_ref().unwrap().id, student.id);
        assert_eq!(get_transaction_by_id(&txn, created.id).await?, Some(created.clone()));

        txn.rollback().await?;
        assert!(get_all_transactions(&db).await?.is_empty());
        assert!(get_transaction_by_id(&db, created.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_get_completed_transactions_filters_status() -> Result<()> {
        let (db, student) = setup_with_student().await?;
        create_test_transaction(
            &db,
            &student.id,
            TransactionType::FeePayment,
            100,
            TransactionStatus::Completed,
        )
        .await?;
        create_test_transaction(
            &db,
            &student.id,
            TransactionType::FeePayment,
            50,
            TransactionStatus::Pending,
        )
        .await?;

        let completed = get_completed_transactions_for_student(&db, &student.id).await?;
        assert_eq!(completed.len(), 1);
        assert!(completed[0].is_completed());
        Ok(())
    }

    #[tokio::test]
    async fn test_get_transactions_between_is_inclusive() -> Result<()> {
        let (db, student) = setup_with_student().await?;
        for day in ["2026-01-31", "2026-02-01", "2026-02-28", "2026-03-01"] {
            create_dated_transaction(
                &db,
                &student.id,
                TransactionType::FeePayment,
                10,
                TransactionStatus::Completed,
                day,
            )
            .await?;
        }

        let february =
            get_transactions_between(&db, Some(date("2026-02-01")), Some(date("2026-02-28")))
                .await?;
        let days: Vec<NaiveDate> = february.iter().map(|t| t.payment_date).collect();
        assert_eq!(days, vec![date("2026-02-01"), date("2026-02-28")]);

        let from_feb = get_transactions_between(&db, Some(date("2026-02-01")), None).await?;
        assert_eq!(from_feb.len(), 3);

        let everything = get_transactions_between(&db, None, None).await?;
        assert_eq!(everything.len(), 4);
        Ok(())
    }
}
