/// Database configuration and connection management
pub mod database;

/// School roster and fee configuration loading from school.toml
pub mod school;
