//! Roster business logic - class levels, students, staff and fee structures.
//!
//! The ledger only references these records by ID. This module is the class
//! roster and fee structure provider the invoicing code asks for "every student
//! in class X" and "the amount of fee Y", and it seeds the roster from the
//! school configuration on start-up.

use crate::{
    config::school::SchoolConfig,
    entities::{
        ClassLevel, FeeStructure, Staff, Student, class_level, fee_structure, staff, student,
    },
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// Counts of rows inserted by [`seed_school`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Class levels inserted
    pub class_levels: usize,
    /// Staff inserted
    pub staff: usize,
    /// Students inserted
    pub students: usize,
    /// Fee structures inserted
    pub fee_structures: usize,
}

/// Retrieves every class level, ordered by name.
pub async fn get_class_levels<C>(db: &C) -> Result<Vec<class_level::Model>>
where
    C: ConnectionTrait,
{
    ClassLevel::find()
        .order_by_asc(class_level::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a class level by ID.
pub async fn get_class_level_by_id<C>(db: &C, id: &str) -> Result<Option<class_level::Model>>
where
    C: ConnectionTrait,
{
    ClassLevel::find_by_id(id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a student by admission number, active or not.
pub async fn get_student_by_id<C>(db: &C, id: &str) -> Result<Option<student::Model>>
where
    C: ConnectionTrait,
{
    Student::find_by_id(id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every active student, ordered by family then given name.
pub async fn get_all_active_students<C>(db: &C) -> Result<Vec<student::Model>>
where
    C: ConnectionTrait,
{
    Student::find()
        .filter(student::Column::IsActive.eq(true))
        .order_by_asc(student::Column::LastName)
        .order_by_asc(student::Column::FirstName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the active students enrolled in one class level.
///
/// This is the roster used for bulk invoicing, so it accepts a transaction as
/// well as a plain connection.
pub async fn get_students_in_class<C>(db: &C, class_level_id: &str) -> Result<Vec<student::Model>>
where
    C: ConnectionTrait,
{
    Student::find()
        .filter(student::Column::ClassLevelId.eq(class_level_id))
        .filter(student::Column::IsActive.eq(true))
        .order_by_asc(student::Column::LastName)
        .order_by_asc(student::Column::FirstName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a fee structure by ID.
pub async fn get_fee_structure_by_id<C>(db: &C, id: &str) -> Result<Option<fee_structure::Model>>
where
    C: ConnectionTrait,
{
    FeeStructure::find_by_id(id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every fee structure, grouped by class level.
pub async fn get_fee_structures<C>(db: &C) -> Result<Vec<fee_structure::Model>>
where
    C: ConnectionTrait,
{
    FeeStructure::find()
        .order_by_asc(fee_structure::Column::ClassLevelId)
        .order_by_asc(fee_structure::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a staff member by identity provider ID.
pub async fn get_staff_by_id<C>(db: &C, id: &str) -> Result<Option<staff::Model>>
where
    C: ConnectionTrait,
{
    Staff::find_by_id(id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

fn require_text(value: &str, what: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Config {
            message: format!("{what} cannot be empty"),
        });
    }
    Ok(trimmed.to_string())
}

/// Inserts a class level.
pub async fn create_class_level<C>(db: &C, id: &str, name: &str) -> Result<class_level::Model>
where
    C: ConnectionTrait,
{
    class_level::ActiveModel {
        id: Set(require_text(id, "Class level id")?),
        name: Set(require_text(name, "Class level name")?),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Inserts a staff member.
pub async fn create_staff<C>(db: &C, id: &str, name: &str, role: &str) -> Result<staff::Model>
where
    C: ConnectionTrait,
{
    staff::ActiveModel {
        id: Set(require_text(id, "Staff id")?),
        name: Set(require_text(name, "Staff name")?),
        role: Set(role.trim().to_string()),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Inserts a student. The class level must already exist.
pub async fn create_student<C>(
    db: &C,
    id: &str,
    first_name: &str,
    last_name: &str,
    class_level_id: &str,
    is_active: bool,
) -> Result<student::Model>
where
    C: ConnectionTrait,
{
    if get_class_level_by_id(db, class_level_id).await?.is_none() {
        return Err(Error::ClassLevelNotFound {
            id: class_level_id.to_string(),
        });
    }

    student::ActiveModel {
        id: Set(require_text(id, "Student id")?),
        first_name: Set(require_text(first_name, "First name")?),
        last_name: Set(require_text(last_name, "Last name")?),
        class_level_id: Set(class_level_id.to_string()),
        is_active: Set(is_active),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Inserts a fee structure. The class level must already exist.
pub async fn create_fee_structure<C>(
    db: &C,
    id: &str,
    name: &str,
    class_level_id: &str,
    amount: Decimal,
    academic_year: Option<String>,
) -> Result<fee_structure::Model>
where
    C: ConnectionTrait,
{
    if amount < Decimal::ZERO {
        return Err(Error::Config {
            message: format!("Fee structure '{id}' has a negative amount"),
        });
    }

    if get_class_level_by_id(db, class_level_id).await?.is_none() {
        return Err(Error::ClassLevelNotFound {
            id: class_level_id.to_string(),
        });
    }

    fee_structure::ActiveModel {
        id: Set(require_text(id, "Fee structure id")?),
        name: Set(require_text(name, "Fee structure name")?),
        class_level_id: Set(class_level_id.to_string()),
        amount: Set(amount),
        academic_year: Set(academic_year),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Inserts every roster entry from `config` that is not in the database yet.
///
/// Rows that already exist are skipped without being updated, so the function
/// can run on every start-up. The whole seed runs in one database transaction.
pub async fn seed_school<C>(db: &C, config: &SchoolConfig) -> Result<SeedReport>
where
    C: TransactionTrait,
{
    info!(
        "Seeding school roster: {} class levels, {} staff, {} students, {} fee structures in config",
        config.class_levels.len(),
        config.staff.len(),
        config.students.len(),
        config.fee_structures.len()
    );

    let txn = db.begin().await?;
    let mut report = SeedReport::default();

    for cfg in &config.class_levels {
        if get_class_level_by_id(&txn, &cfg.id).await?.is_some() {
            debug!("Class level '{}' already exists. Skipping.", cfg.id);
            continue;
        }
        create_class_level(&txn, &cfg.id, &cfg.name).await?;
        report.class_levels += 1;
    }

    for cfg in &config.staff {
        if get_staff_by_id(&txn, &cfg.id).await?.is_some() {
            debug!("Staff '{}' already exists. Skipping.", cfg.id);
            continue;
        }
        create_staff(&txn, &cfg.id, &cfg.name, &cfg.role).await?;
        report.staff += 1;
    }

    for cfg in &config.students {
        if get_student_by_id(&txn, &cfg.id).await?.is_some() {
            debug!("Student '{}' already exists. Skipping.", cfg.id);
            continue;
        }
        create_student(
            &txn,
            &cfg.id,
            &cfg.first_name,
            &cfg.last_name,
            &cfg.class_level_id,
            cfg.is_active,
        )
        .await?;
        report.students += 1;
    }

    for cfg in &config.fee_structures {
        if get_fee_structure_by_id(&txn, &cfg.id).await?.is_some() {
            debug!("Fee structure '{}' already exists. Skipping.", cfg.id);
            continue;
        }
        create_fee_structure(
            &txn,
            &cfg.id,
            &cfg.name,
            &cfg.class_level_id,
            cfg.amount,
            cfg.academic_year.clone(),
        )
        .await?;
        report.fee_structures += 1;
    }

    txn.commit().await?;

    info!(
        "Seeded {} class levels, {} staff, {} students, {} fee structures",
        report.class_levels, report.staff, report.students, report.fee_structures
    );
    Ok(report)
}
