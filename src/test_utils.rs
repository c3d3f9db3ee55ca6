//! Shared test utilities for Stockroom.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        catalog::{self, NewPart},
        purchase_order::{self, CreatedOrder},
    },
    entities,
    errors::Result,
    notify::EmailStubNotifier,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test database together with one default part ("Oil Filter",
/// price 10.0, stock 0, threshold 5) for tests that just need a part.
pub async fn setup_with_part() -> Result<(DatabaseConnection, entities::part::Model)> {
    let db = setup_test_db().await?;
    let part = create_test_part(&db, "Oil Filter", "OF-200").await?;
    Ok((db, part))
}

/// Builds a [`NewPart`] with default price 10.0, no stock, threshold 5.
#[must_use]
pub fn new_part(name: &str, sku: &str) -> NewPart {
    NewPart {
        name: name.to_string(),
        sku: sku.to_string(),
        price: 10.0,
        stock: 0,
        reorder_threshold: 5,
        shelf_location: None,
        vendor_id: None,
    }
}

/// Creates a test part with the defaults of [`new_part`].
pub async fn create_test_part(
    db: &DatabaseConnection,
    name: &str,
    sku: &str,
) -> Result<entities::part::Model> {
    catalog::create_part(db, new_part(name, sku)).await
}

/// Creates a test part with custom price, stock, threshold, and vendor.
/// Use this when the test depends on specific catalog values.
pub async fn create_custom_part(
    db: &DatabaseConnection,
    name: &str,
    sku: &str,
    price: f64,
    stock: i64,
    reorder_threshold: i64,
    vendor_id: Option<i64>,
) -> Result<entities::part::Model> {
    catalog::create_part(
        db,
        NewPart {
            name: name.to_string(),
            sku: sku.to_string(),
            price,
            stock,
            reorder_threshold,
            shelf_location: None,
            vendor_id,
        },
    )
    .await
}

/// Creates a test vendor with no contact details.
pub async fn create_test_vendor(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::vendor::Model> {
    catalog::create_vendor(db, name.to_string(), None, None).await
}

/// Creates one DRAFT purchase order covering the selection.
///
/// The selection must resolve to a single vendor group; the first created
/// order is returned.
pub async fn create_draft_order(
    db: &DatabaseConnection,
    selection: &[(i64, i64)],
) -> Result<CreatedOrder> {
    let mut created = purchase_order::create_purchase_orders(db, selection).await?;
    Ok(created.remove(0))
}

/// Creates a purchase order and moves it straight to SENT so receiving
/// tests can book deliveries against it.
pub async fn create_sent_order(
    db: &DatabaseConnection,
    selection: &[(i64, i64)],
) -> Result<CreatedOrder> {
    let mut created = create_draft_order(db, selection).await?;
    created.order = purchase_order::send(db, created.order.id, &EmailStubNotifier).await?;
    Ok(created)
}
