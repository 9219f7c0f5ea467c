//! Invoice entity - A bill issued to one student, optionally for a fee structure.
//!
//! Invoices move through `PENDING -> PARTIAL -> PAID`, and any invoice can be
//! flagged `OVERDUE` once its due date has passed. See [`InvoiceStatus`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Invoice database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    /// Unique identifier for the invoice
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Student being billed
    pub student_id: String,
    /// Fee structure the amount was taken from, if any
    pub fee_structure_id: Option<String>,
    /// Amount billed
    pub amount: Decimal,
    /// Date payment is due
    pub due_date: Date,
    /// One of `PENDING`, `PARTIAL`, `PAID`, `OVERDUE`
    pub status: String,
    /// When the invoice was created
    pub created_at: DateTimeUtc,
    /// When the invoice was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Invoice and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each invoice belongs to one student
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
    /// Each invoice may be billed against one fee structure
    #[sea_orm(
        belongs_to = "super::fee_structure::Entity",
        from = "Column::FeeStructureId",
        to = "super::fee_structure::Column::Id"
    )]
    FeeStructure,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::fee_structure::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeStructure.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Payment progress of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Nothing paid yet
    Pending,
    /// Some but not all of the amount paid
    Partial,
    /// Settled in full
    Paid,
    /// Due date passed before settlement
    Overdue,
}

impl InvoiceStatus {
    /// All variants, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Partial, Self::Paid, Self::Overdue];

    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Partial => "PARTIAL",
            Self::Paid => "PAID",
            Self::Overdue => "OVERDUE",
        }
    }

    /// Position along the payment progression; `OVERDUE` sits outside it.
    const fn progress(self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Partial => Some(1),
            Self::Paid => Some(2),
            Self::Overdue => None,
        }
    }

    /// Whether an invoice in `self` may be moved to `next`.
    ///
    /// Payment only moves forward (`PENDING -> PARTIAL -> PAID`), anything may
    /// become `OVERDUE`, and an overdue invoice can still be paid in part or in
    /// full. Staying in the same state is always allowed.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        match (self.progress(), next.progress()) {
            (_, None) => true,
            (None, Some(to)) => to > 0,
            (Some(from), Some(to)) => to >= from,
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "PARTIAL" => Ok(Self::Partial),
            "PAID" => Ok(Self::Paid),
            "OVERDUE" => Ok(Self::Overdue),
            other => Err(format!(
                "unknown invoice status '{other}' (expected PENDING, PARTIAL, PAID or OVERDUE)"
            )),
        }
    }
}
