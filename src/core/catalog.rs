//! Catalog business logic - part and vendor records.
//!
//! Owns creation and edits of parts and vendors. SKU and vendor-name
//! uniqueness is pre-checked as a fast fail, but the storage layer's unique
//! constraint is the actual guarantee: a constraint violation raced past the
//! pre-check still surfaces as the duplicate error. Manual stock adjustments
//! go through [`adjust_stock`], which pairs the guarded counter update with a
//! ledger entry in one transaction.

use crate::{
    entities::{
        MovementReason, Part, PoStatus, PurchaseOrder, PurchaseOrderItem, SalesOrderItem,
        StockMovement, part, purchase_order, purchase_order_item, sales_order_item,
        stock_movement, vendor,
    },
    errors::{Error, Result},
};
use crate::{core::ledger, entities::Vendor};
use sea_orm::{
    PaginatorTrait, QueryOrder, Set, SqlErr, TransactionTrait, prelude::*, sea_query::Expr,
};

/// Input for [`create_part`].
#[derive(Debug, Clone)]
pub struct NewPart {
    /// Human-readable name, required
    pub name: String,
    /// Unique SKU, required
    pub sku: String,
    /// Unit price, must be non-negative and finite
    pub price: f64,
    /// Initial stock level, must be non-negative
    pub stock: i64,
    /// Reorder threshold, must be non-negative
    pub reorder_threshold: i64,
    /// Optional shelf location
    pub shelf_location: Option<String>,
    /// Optional supplying vendor
    pub vendor_id: Option<i64>,
}

fn validate_price(price: f64) -> Result<()> {
    if price < 0.0 || !price.is_finite() {
        return Err(Error::Validation {
            message: format!("price must be a non-negative number, got {price}"),
        });
    }
    Ok(())
}

/// Maps a storage-layer unique-constraint violation to the duplicate error,
/// leaving everything else as a generic database failure.
fn map_unique(err: sea_orm::DbErr, duplicate: Error) -> Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => duplicate,
        _ => Error::Database(err),
    }
}

// --- Vendors ---

/// Creates a vendor with a unique, non-empty name.
pub async fn create_vendor(
    db: &DatabaseConnection,
    name: String,
    contact_email: Option<String>,
    phone: Option<String>,
) -> Result<vendor::Model> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Vendor name cannot be empty".to_string(),
        });
    }

    // Fast-fail pre-check; the unique constraint below is the real guarantee.
    if get_vendor_by_name(db, &name).await?.is_some() {
        return Err(Error::DuplicateVendorName { name });
    }

    let vendor = vendor::ActiveModel {
        name: Set(name.clone()),
        contact_email: Set(contact_email),
        phone: Set(phone),
        ..Default::default()
    };
    vendor
        .insert(db)
        .await
        .map_err(|err| map_unique(err, Error::DuplicateVendorName { name }))
}

/// Finds a vendor by its unique ID.
pub async fn get_vendor_by_id(
    db: &DatabaseConnection,
    vendor_id: i64,
) -> Result<Option<vendor::Model>> {
    Vendor::find_by_id(vendor_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a vendor by its unique name.
pub async fn get_vendor_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<vendor::Model>> {
    Vendor::find()
        .filter(vendor::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all vendors, ordered alphabetically by name.
pub async fn list_vendors(db: &DatabaseConnection) -> Result<Vec<vendor::Model>> {
    Vendor::find()
        .order_by_asc(vendor::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a vendor, refusing while it still has open purchase orders.
///
/// Historical (terminal) purchase orders and parts that reference the vendor
/// get their vendor reference nulled in the same transaction, so referential
/// integrity survives the deletion.
pub async fn delete_vendor(db: &DatabaseConnection, vendor_id: i64) -> Result<()> {
    let vendor = get_vendor_by_id(db, vendor_id)
        .await?
        .ok_or(Error::VendorNotFound { id: vendor_id })?;

    let open = PurchaseOrder::find()
        .filter(purchase_order::Column::VendorId.eq(vendor_id))
        .filter(
            purchase_order::Column::Status
                .is_not_in([PoStatus::Received, PoStatus::Canceled]),
        )
        .count(db)
        .await?;
    if open > 0 {
        return Err(Error::VendorHasOpenOrders {
            name: vendor.name,
            open,
        });
    }

    let txn = db.begin().await?;

    Part::update_many()
        .col_expr(part::Column::VendorId, Expr::value(Option::<i64>::None))
        .filter(part::Column::VendorId.eq(vendor_id))
        .exec(&txn)
        .await?;

    PurchaseOrder::update_many()
        .col_expr(
            purchase_order::Column::VendorId,
            Expr::value(Option::<i64>::None),
        )
        .filter(purchase_order::Column::VendorId.eq(vendor_id))
        .exec(&txn)
        .await?;

    Vendor::delete_by_id(vendor_id).exec(&txn).await?;

    txn.commit().await?;
    Ok(())
}

// --- Parts ---

/// Creates a part, enforcing the validation rules and SKU uniqueness.
pub async fn create_part(db: &DatabaseConnection, new: NewPart) -> Result<part::Model> {
    let name = new.name.trim().to_string();
    let sku = new.sku.trim().to_string();
    if name.is_empty() || sku.is_empty() {
        return Err(Error::Validation {
            message: "Part name and SKU are required".to_string(),
        });
    }
    validate_price(new.price)?;
    if new.stock < 0 {
        return Err(Error::Validation {
            message: format!("initial stock must be non-negative, got {}", new.stock),
        });
    }
    if new.reorder_threshold < 0 {
        return Err(Error::Validation {
            message: format!(
                "reorder threshold must be non-negative, got {}",
                new.reorder_threshold
            ),
        });
    }
    if let Some(vendor_id) = new.vendor_id {
        get_vendor_by_id(db, vendor_id)
            .await?
            .ok_or(Error::VendorNotFound { id: vendor_id })?;
    }

    // Fast-fail pre-check; the unique constraint below is the real guarantee.
    if get_part_by_sku(db, &sku).await?.is_some() {
        return Err(Error::DuplicateSku { sku });
    }

    let part = part::ActiveModel {
        name: Set(name),
        sku: Set(sku.clone()),
        price: Set(new.price),
        stock: Set(new.stock),
        reorder_threshold: Set(new.reorder_threshold),
        shelf_location: Set(new.shelf_location),
        vendor_id: Set(new.vendor_id),
        ..Default::default()
    };
    part.insert(db)
        .await
        .map_err(|err| map_unique(err, Error::DuplicateSku { sku }))
}

/// Finds a part by its unique ID.
pub async fn get_part_by_id(db: &DatabaseConnection, part_id: i64) -> Result<Option<part::Model>> {
    Part::find_by_id(part_id).one(db).await.map_err(Into::into)
}

/// Finds a part by its unique SKU.
pub async fn get_part_by_sku(db: &DatabaseConnection, sku: &str) -> Result<Option<part::Model>> {
    Part::find()
        .filter(part::Column::Sku.eq(sku))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all parts, ordered alphabetically by name.
pub async fn list_parts(db: &DatabaseConnection) -> Result<Vec<part::Model>> {
    Part::find()
        .order_by_asc(part::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Updates a part's editable fields (not SKU or stock).
pub async fn update_part(
    db: &DatabaseConnection,
    part_id: i64,
    new_name: String,
    new_price: f64,
    new_reorder_threshold: i64,
    new_shelf_location: Option<String>,
) -> Result<part::Model> {
    let new_name = new_name.trim().to_string();
    if new_name.is_empty() {
        return Err(Error::Validation {
            message: "Part name cannot be empty".to_string(),
        });
    }
    validate_price(new_price)?;
    if new_reorder_threshold < 0 {
        return Err(Error::Validation {
            message: format!(
                "reorder threshold must be non-negative, got {new_reorder_threshold}"
            ),
        });
    }

    let mut part: part::ActiveModel = get_part_by_id(db, part_id)
        .await?
        .ok_or(Error::PartNotFound { id: part_id })?
        .into();
    part.name = Set(new_name);
    part.price = Set(new_price);
    part.reorder_threshold = Set(new_reorder_threshold);
    part.shelf_location = Set(new_shelf_location);
    part.update(db).await.map_err(Into::into)
}

/// Changes a part's SKU, enforcing uniqueness the same way as creation.
pub async fn change_sku(
    db: &DatabaseConnection,
    part_id: i64,
    new_sku: String,
) -> Result<part::Model> {
    let new_sku = new_sku.trim().to_string();
    if new_sku.is_empty() {
        return Err(Error::Validation {
            message: "SKU cannot be empty".to_string(),
        });
    }

    let current = get_part_by_id(db, part_id)
        .await?
        .ok_or(Error::PartNotFound { id: part_id })?;
    if let Some(other) = get_part_by_sku(db, &new_sku).await? {
        if other.id != part_id {
            return Err(Error::DuplicateSku { sku: new_sku });
        }
    }

    let mut part: part::ActiveModel = current.into();
    part.sku = Set(new_sku.clone());
    part.update(db)
        .await
        .map_err(|err| map_unique(err, Error::DuplicateSku { sku: new_sku }))
}

/// Reassigns (or clears) the part's vendor.
pub async fn assign_vendor(
    db: &DatabaseConnection,
    part_id: i64,
    vendor_id: Option<i64>,
) -> Result<part::Model> {
    if let Some(id) = vendor_id {
        get_vendor_by_id(db, id)
            .await?
            .ok_or(Error::VendorNotFound { id })?;
    }
    let mut part: part::ActiveModel = get_part_by_id(db, part_id)
        .await?
        .ok_or(Error::PartNotFound { id: part_id })?
        .into();
    part.vendor_id = Set(vendor_id);
    part.update(db).await.map_err(Into::into)
}

/// Hard-deletes a part, refusing while any purchase-order line, sales-order
/// snapshot, or ledger entry still references it. History stays intact.
pub async fn delete_part(db: &DatabaseConnection, part_id: i64) -> Result<()> {
    get_part_by_id(db, part_id)
        .await?
        .ok_or(Error::PartNotFound { id: part_id })?;

    let po_refs = PurchaseOrderItem::find()
        .filter(purchase_order_item::Column::PartId.eq(part_id))
        .count(db)
        .await?;
    let sale_refs = SalesOrderItem::find()
        .filter(sales_order_item::Column::PartId.eq(part_id))
        .count(db)
        .await?;
    let ledger_refs = StockMovement::find()
        .filter(stock_movement::Column::PartId.eq(part_id))
        .count(db)
        .await?;
    if po_refs + sale_refs + ledger_refs > 0 {
        return Err(Error::Validation {
            message: format!(
                "part {part_id} is referenced by order history and cannot be deleted"
            ),
        });
    }

    Part::delete_by_id(part_id).exec(db).await?;
    Ok(())
}

/// Manually adjusts a part's stock by a signed delta, writing the paired
/// ledger entry in the same transaction.
///
/// The decrement path is a guarded atomic update (`stock = stock + delta`
/// with a `stock >= -delta` filter), so the stock can never go negative even
/// under concurrent adjustments.
pub async fn adjust_stock(
    db: &DatabaseConnection,
    part_id: i64,
    delta: i64,
) -> Result<part::Model> {
    if delta == 0 {
        return Err(Error::Validation {
            message: "adjustment delta cannot be zero".to_string(),
        });
    }

    let txn = db.begin().await?;

    let part = Part::find_by_id(part_id)
        .one(&txn)
        .await?
        .ok_or(Error::PartNotFound { id: part_id })?;

    let mut update = Part::update_many()
        .col_expr(
            part::Column::Stock,
            Expr::col(part::Column::Stock).add(delta),
        )
        .filter(part::Column::Id.eq(part_id));
    if delta < 0 {
        update = update.filter(part::Column::Stock.gte(-delta));
    }
    let result = update.exec(&txn).await?;
    if result.rows_affected == 0 {
        // Guard refused the decrement: the shelf does not hold enough.
        return Err(Error::InsufficientStock {
            name: part.name,
            requested: -delta,
            available: part.stock,
        });
    }

    ledger::record_movement(
        &txn,
        part_id,
        delta,
        MovementReason::Adjust,
        ledger::REF_MANUAL,
        None,
    )
    .await?;

    txn.commit().await?;

    Part::find_by_id(part_id)
        .one(db)
        .await?
        .ok_or(Error::PartNotFound { id: part_id })
}
