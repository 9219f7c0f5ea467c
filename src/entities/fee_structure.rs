//! Fee structure entity - A priced fee template for one class level.
//!
//! Bulk invoice generation copies `amount` onto one invoice per student.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fee structure database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_structures")]
pub struct Model {
    /// School-assigned identifier (e.g., `"g7-term1-tuition"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name (e.g., "Term 1 Tuition")
    pub name: String,
    /// Class level this fee applies to
    pub class_level_id: String,
    /// Amount billed per student
    pub amount: Decimal,
    /// Optional academic year label (e.g., `"2026/2027"`)
    pub academic_year: Option<String>,
}

/// Defines relationships between `FeeStructure` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each fee structure belongs to one class level
    #[sea_orm(
        belongs_to = "super::class_level::Entity",
        from = "Column::ClassLevelId",
        to = "super::class_level::Column::Id"
    )]
    ClassLevel,
    /// One fee structure is billed on many invoices
    #[sea_orm(has_many = "super::invoice::Entity")]
    Invoices,
}

impl Related<super::class_level::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassLevel.def()
    }
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
