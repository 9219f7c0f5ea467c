//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the school's finance tables and the roster tables
//! they reference. Each entity has a Model struct for data and an Entity struct
//! for operations.

pub mod class_level;
pub mod fee_structure;
pub mod invoice;
pub mod staff;
pub mod student;
pub mod transaction;

// Re-export specific types to avoid conflicts
pub use class_level::{
    Column as ClassLevelColumn, Entity as ClassLevel, Model as ClassLevelModel,
};
pub use fee_structure::{
    Column as FeeStructureColumn, Entity as FeeStructure, Model as FeeStructureModel,
};
pub use invoice::{Column as InvoiceColumn, Entity as Invoice, Model as InvoiceModel};
pub use staff::{Column as StaffColumn, Entity as Staff, Model as StaffModel};
pub use student::{Column as StudentColumn, Entity as Student, Model as StudentModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
