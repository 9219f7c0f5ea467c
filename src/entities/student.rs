//! Student entity - The party every transaction and invoice is charged to.
//!
//! Students are keyed by their admission number and belong to exactly one
//! class level. Inactive students keep their ledger history but are skipped by
//! bulk invoicing.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Student database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    /// Admission number (e.g., `"STU-0042"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Class level the student is enrolled in
    pub class_level_id: String,
    /// Whether the student is currently enrolled
    pub is_active: bool,
}

impl Model {
    /// Returns `"First Last"` for display.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Defines relationships between Student and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each student belongs to one class level
    #[sea_orm(
        belongs_to = "super::class_level::Entity",
        from = "Column::ClassLevelId",
        to = "super::class_level::Column::Id"
    )]
    ClassLevel,
    /// One student has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// One student has many invoices
    #[sea_orm(has_many = "super::invoice::Entity")]
    Invoices,
}

impl Related<super::class_level::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassLevel.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
