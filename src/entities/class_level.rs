//! Class level entity - A grade or form that students belong to (e.g., "Grade 7").
//!
//! Fee structures are defined per class level, and bulk invoicing targets every
//! active student of one class level.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Class level database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "class_levels")]
pub struct Model {
    /// School-assigned identifier (e.g., `"grade-7"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name
    pub name: String,
}

/// Defines relationships between `ClassLevel` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One class level has many students
    #[sea_orm(has_many = "super::student::Entity")]
    Students,
    /// One class level has many fee structures
    #[sea_orm(has_many = "super::fee_structure::Entity")]
    FeeStructures,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl Related<super::fee_structure::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeStructures.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
