//! Database configuration module for Stockroom.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. Tables
//! are generated with `Schema::create_table_from_entity`, so the database
//! schema always matches the entity definitions without hand-written SQL.

use crate::entities::{
    Part, PurchaseOrder, PurchaseOrderItem, SalesOrder, SalesOrderItem, StockMovement, Vendor,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the `DATABASE_URL` environment variable,
/// falling back to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/stockroom.sqlite".to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions.
///
/// Safe to run on every startup: each statement carries `IF NOT EXISTS`.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = vec![
        schema.create_table_from_entity(Vendor),
        schema.create_table_from_entity(Part),
        schema.create_table_from_entity(PurchaseOrder),
        schema.create_table_from_entity(PurchaseOrderItem),
        schema.create_table_from_entity(SalesOrder),
        schema.create_table_from_entity(SalesOrderItem),
        schema.create_table_from_entity(StockMovement),
    ];
    for statement in &mut statements {
        db.execute(builder.build(statement.if_not_exists())).await?;
    }

    Ok(())
}
