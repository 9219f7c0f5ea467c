//! Transaction entity - Represents every money movement on a student's account.
//!
//! Each transaction has a `student_id`, amount, `transaction_type`
//! (`fee_payment`, `fine`, `refund`), `status` (`pending`, `completed`),
//! `payment_date`, and the `created_by_staff_id` of whoever recorded it.
//! Amounts are always positive; the type decides the direction.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Student the transaction is posted to
    pub student_id: String,
    /// Transaction amount, always positive
    pub amount: Decimal,
    /// Type of transaction: `"fee_payment"`, `"fine"`, or `"refund"`
    pub transaction_type: String,
    /// Settlement state: `"pending"` or `"completed"`
    pub status: String,
    /// Date the money changed hands
    pub payment_date: Date,
    /// Optional free-text note (receipt number, reason for a fine, ...)
    pub description: Option<String>,
    /// Staff member who recorded the transaction
    pub created_by_staff_id: Option<String>,
    /// When the row was inserted
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Parsed transaction type, or `None` for values written outside this crate.
    #[must_use]
    pub fn kind(&self) -> Option<TransactionType> {
        self.transaction_type.parse().ok()
    }

    /// Whether the transaction has settled.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed.as_str()
    }

    /// Whether the transaction is still awaiting settlement.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending.as_str()
    }
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one student
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
    /// Each transaction may reference the staff member who recorded it
    #[sea_orm(
        belongs_to = "super::staff::Entity",
        from = "Column::CreatedByStaffId",
        to = "super::staff::Column::Id"
    )]
    Staff,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Staff.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Kind of money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Student paid (part of) their fees
    FeePayment,
    /// Penalty charged to the student
    Fine,
    /// Money returned to the student
    Refund,
}

impl TransactionType {
    /// All variants, in display order.
    pub const ALL: [Self; 3] = [Self::FeePayment, Self::Fine, Self::Refund];

    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FeePayment => "fee_payment",
            Self::Fine => "fine",
            Self::Refund => "refund",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fee_payment" => Ok(Self::FeePayment),
            "fine" => Ok(Self::Fine),
            "refund" => Ok(Self::Refund),
            other => Err(format!(
                "unknown transaction type '{other}' (expected fee_payment, fine or refund)"
            )),
        }
    }
}

/// Settlement state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Recorded but not yet settled
    Pending,
    /// Settled; counts toward the balance
    Completed,
}

impl TransactionStatus {
    /// All variants, in display order.
    pub const ALL: [Self; 2] = [Self::Pending, Self::Completed];

    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(format!(
                "unknown transaction status '{other}' (expected pending or completed)"
            )),
        }
    }
}
