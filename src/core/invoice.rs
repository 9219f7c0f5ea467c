//! Invoice business logic - issuing, editing and removing student invoices.
//!
//! Invoices are created one at a time or in bulk for every active student of a
//! class level against a fee structure. Bulk generation is all-or-nothing: the
//! whole batch runs in one database transaction, so a failure on any student
//! leaves no invoice from that batch behind.
//!
//! Status changes follow [`InvoiceStatus::can_transition_to`]. Overdue marking
//! is a separate sweep ([`mark_overdue_invoices`]) that the caller runs with
//! the current date; edits never flag an invoice overdue on their own.

use crate::{
    core::{
        roster,
        validation::{
            BulkInvoiceRequest, InvoiceUpdate, NewInvoice, ValidationErrors,
            validate_bulk_request, validate_invoice_update, validate_new_invoice,
        },
    },
    entities::{
        Invoice, fee_structure,
        invoice::{self, InvoiceStatus},
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{info, warn};

async fn ensure_not_billed<C>(db: &C, student_id: &str, fee_structure_id: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let existing = Invoice::find()
        .filter(invoice::Column::StudentId.eq(student_id))
        .filter(invoice::Column::FeeStructureId.eq(fee_structure_id))
        .one(db)
        .await?;

    if existing.is_some() {
        return Err(Error::DuplicateInvoice {
            student_id: student_id.to_string(),
            fee_structure_id: fee_structure_id.to_string(),
        });
    }
    Ok(())
}

fn ensure_fee_for_class(fee: &fee_structure::Model, class_level_id: &str) -> Result<()> {
    if fee.class_level_id != class_level_id {
        return Err(ValidationErrors::single(
            "fee_structure_id",
            format!(
                "fee structure '{}' belongs to class level '{}', not '{class_level_id}'",
                fee.id, fee.class_level_id
            ),
        )
        .into());
    }
    Ok(())
}

async fn insert_pending<C>(
    db: &C,
    student_id: String,
    fee_structure_id: Option<String>,
    amount: Decimal,
    due_date: NaiveDate,
) -> Result<invoice::Model>
where
    C: ConnectionTrait,
{
    let now = Utc::now();
    invoice::ActiveModel {
        student_id: Set(student_id),
        fee_structure_id: Set(fee_structure_id),
        amount: Set(amount),
        due_date: Set(due_date),
        status: Set(InvoiceStatus::Pending.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a single `PENDING` invoice.
///
/// When a fee structure is given and no explicit amount, the fee structure's
/// amount is billed. A student can be billed for a given fee structure once.
///
/// # Errors
/// Returns [`Error::Validation`] for malformed input, not-found errors for an
/// unknown student or fee structure, [`Error::DuplicateInvoice`] when the
/// student was already billed for the fee structure, and store errors.
pub async fn create_invoice<C>(db: &C, input: &NewInvoice) -> Result<invoice::Model>
where
    C: ConnectionTrait,
{
    let draft = validate_new_invoice(input)?;

    let Some(student) = roster::get_student_by_id(db, &draft.student_id).await? else {
        return Err(Error::StudentNotFound {
            id: draft.student_id,
        });
    };

    let amount = match &draft.fee_structure_id {
        Some(fee_structure_id) => {
            let fee = roster::get_fee_structure_by_id(db, fee_structure_id)
                .await?
                .ok_or_else(|| Error::FeeStructureNotFound {
                    id: fee_structure_id.clone(),
                })?;
            ensure_fee_for_class(&fee, &student.class_level_id)?;
            ensure_not_billed(db, &draft.student_id, fee_structure_id).await?;
            draft.amount.unwrap_or(fee.amount)
        }
        None => draft.amount.unwrap_or_default(),
    };

    let created = insert_pending(
        db,
        draft.student_id,
        draft.fee_structure_id,
        amount,
        draft.due_date,
    )
    .await?;
    info!(
        "Created invoice {} for student {}: {} due {}",
        created.id, created.student_id, created.amount, created.due_date
    );
    Ok(created)
}

/// Bills every active student of a class level for one fee structure.
///
/// Each student gets one `PENDING` invoice for the fee structure's amount, due
/// on the requested date. The batch is atomic: if any insert fails, including
/// a student who was already billed for this fee structure, nothing is kept.
/// A class level with no active students produces an empty batch.
///
/// # Errors
/// Returns [`Error::Validation`] for malformed input or a fee structure that
/// belongs to another class level, not-found errors for an unknown class level
/// or fee structure, [`Error::DuplicateInvoice`], and store errors.
pub async fn bulk_generate_invoices<C>(
    db: &C,
    input: &BulkInvoiceRequest,
) -> Result<Vec<invoice::Model>>
where
    C: TransactionTrait,
{
    let plan = validate_bulk_request(input)?;

    let txn = db.begin().await?;

    if roster::get_class_level_by_id(&txn, &plan.class_level_id)
        .await?
        .is_none()
    {
        return Err(Error::ClassLevelNotFound {
            id: plan.class_level_id,
        });
    }

    let fee = roster::get_fee_structure_by_id(&txn, &plan.fee_structure_id)
        .await?
        .ok_or_else(|| Error::FeeStructureNotFound {
            id: plan.fee_structure_id.clone(),
        })?;

    ensure_fee_for_class(&fee, &plan.class_level_id)?;

    let students = roster::get_students_in_class(&txn, &plan.class_level_id).await?;
    let mut created = Vec::with_capacity(students.len());

    for student in students {
        ensure_not_billed(&txn, &student.id, &fee.id)
            .await
            .inspect_err(|e| warn!("Bulk invoicing aborted at student {}: {e}", student.id))?;
        let invoice = insert_pending(
            &txn,
            student.id,
            Some(fee.id.clone()),
            fee.amount,
            plan.due_date,
        )
        .await?;
        created.push(invoice);
    }

    txn.commit().await?;

    info!(
        "Generated {} invoices for class level {} against fee structure {} due {}",
        created.len(),
        plan.class_level_id,
        fee.id,
        plan.due_date
    );
    Ok(created)
}

/// Finds an invoice by its unique ID.
pub async fn get_invoice_by_id<C>(db: &C, invoice_id: i64) -> Result<Option<invoice::Model>>
where
    C: ConnectionTrait,
{
    Invoice::find_by_id(invoice_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves one student's invoices, earliest due first.
pub async fn get_invoices_for_student<C>(db: &C, student_id: &str) -> Result<Vec<invoice::Model>>
where
    C: ConnectionTrait,
{
    Invoice::find()
        .filter(invoice::Column::StudentId.eq(student_id))
        .order_by_asc(invoice::Column::DueDate)
        .order_by_asc(invoice::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every invoice that is not yet `PAID`, earliest due first.
pub async fn get_open_invoices<C>(db: &C) -> Result<Vec<invoice::Model>>
where
    C: ConnectionTrait,
{
    Invoice::find()
        .filter(invoice::Column::Status.ne(InvoiceStatus::Paid.as_str()))
        .order_by_asc(invoice::Column::DueDate)
        .order_by_asc(invoice::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies edits to an invoice and returns the updated record.
///
/// # Errors
/// Returns [`Error::Validation`] for malformed edits (including a status that
/// is not one of the four known values), [`Error::InvoiceNotFound`],
/// [`Error::InvalidStatusTransition`] for a backwards status change, and store
/// errors.
pub async fn update_invoice<C>(
    db: &C,
    invoice_id: i64,
    input: &InvoiceUpdate,
) -> Result<invoice::Model>
where
    C: ConnectionTrait,
{
    let changes = validate_invoice_update(input)?;

    let current = get_invoice_by_id(db, invoice_id)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice_id })?;

    if let Some(next) = changes.status {
        // Rows written outside this crate may hold other values; let those be corrected
        if let Ok(from) = current.status.parse::<InvoiceStatus>()
            && !from.can_transition_to(next)
        {
            return Err(Error::InvalidStatusTransition {
                from: from.to_string(),
                to: next.to_string(),
            });
        }
    }

    let mut active: invoice::ActiveModel = current.into();
    if let Some(amount) = changes.amount {
        active.amount = Set(amount);
    }
    if let Some(due_date) = changes.due_date {
        active.due_date = Set(due_date);
    }
    if let Some(status) = changes.status {
        active.status = Set(status.as_str().to_string());
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(db).await?;
    info!(
        "Updated invoice {}: {} due {} [{}]",
        updated.id, updated.amount, updated.due_date, updated.status
    );
    Ok(updated)
}

/// Permanently removes an invoice.
///
/// Callers are expected to have confirmed the deletion with the user first.
///
/// # Errors
/// Returns [`Error::InvoiceNotFound`] when there is nothing to delete, and
/// store errors.
pub async fn delete_invoice<C>(db: &C, invoice_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Invoice::delete_by_id(invoice_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::InvoiceNotFound { id: invoice_id });
    }

    info!("Deleted invoice {invoice_id}");
    Ok(())
}

/// Flags every `PENDING` or `PARTIAL` invoice due before `today` as `OVERDUE`.
///
/// Returns the number of invoices that changed.
pub async fn mark_overdue_invoices<C>(db: &C, today: NaiveDate) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = Invoice::update_many()
        .col_expr(
            invoice::Column::Status,
            Expr::value(InvoiceStatus::Overdue.as_str()),
        )
        .col_expr(invoice::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(invoice::Column::DueDate.lt(today))
        .filter(invoice::Column::Status.is_in([
            InvoiceStatus::Pending.as_str(),
            InvoiceStatus::Partial.as_str(),
        ]))
        .exec(db)
        .await?;

    info!(
        "Marked {} invoices overdue as of {today}",
        result.rows_affected
    );
    Ok(result.rows_affected)
}
