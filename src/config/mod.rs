/// Database configuration and connection management
pub mod database;

/// Catalog seeding from catalog.toml
pub mod catalog;
