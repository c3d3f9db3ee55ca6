//! CSV export of the catalog and the purchase-order book.
//!
//! Rows are flat serde structs with vendor names already resolved, so the
//! files open cleanly in a spreadsheet without joining against a vendor
//! dump. Writers are generic over `io::Write` to keep tests off the
//! filesystem.

use std::collections::HashMap;
use std::io::Write;

use crate::{
    core::purchase_order::{order_items, order_total},
    entities::{Part, PurchaseOrder, Vendor, part, purchase_order},
    errors::Result,
};
use sea_orm::{QueryOrder, prelude::*};
use serde::Serialize;

/// One exported catalog row.
#[derive(Debug, Clone, Serialize)]
pub struct PartRow {
    /// Part id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Stock-keeping unit
    pub sku: String,
    /// Unit price
    pub price: f64,
    /// On-hand quantity
    pub stock: i64,
    /// Low-stock threshold
    pub reorder_threshold: i64,
    /// Bin or shelf code, if assigned
    pub shelf_location: Option<String>,
    /// Vendor name, if assigned
    pub vendor: Option<String>,
}

/// One exported purchase-order row.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseOrderRow {
    /// Order id
    pub id: i64,
    /// Vendor name, if the order is addressed to one
    pub vendor: Option<String>,
    /// Lifecycle state
    pub status: String,
    /// Number of lines
    pub lines: usize,
    /// Sum of `qty_ordered * unit_cost`
    pub total: f64,
    /// Creation timestamp, RFC 3339
    pub created_at: String,
}

async fn vendor_names(db: &DatabaseConnection) -> Result<HashMap<i64, String>> {
    let vendors = Vendor::find().all(db).await?;
    Ok(vendors.into_iter().map(|v| (v.id, v.name)).collect())
}

/// Builds export rows for every part, ordered by name.
pub async fn part_rows(db: &DatabaseConnection) -> Result<Vec<PartRow>> {
    let names = vendor_names(db).await?;
    let parts = Part::find()
        .order_by_asc(part::Column::Name)
        .all(db)
        .await?;
    Ok(parts
        .into_iter()
        .map(|p| PartRow {
            id: p.id,
            name: p.name,
            sku: p.sku,
            price: p.price,
            stock: p.stock,
            reorder_threshold: p.reorder_threshold,
            shelf_location: p.shelf_location,
            vendor: p.vendor_id.and_then(|id| names.get(&id).cloned()),
        })
        .collect())
}

/// Builds export rows for every purchase order, oldest first.
pub async fn purchase_order_rows(db: &DatabaseConnection) -> Result<Vec<PurchaseOrderRow>> {
    let names = vendor_names(db).await?;
    let orders = PurchaseOrder::find()
        .order_by_asc(purchase_order::Column::Id)
        .all(db)
        .await?;

    let mut rows = Vec::with_capacity(orders.len());
    for order in orders {
        let items = order_items(db, order.id).await?;
        rows.push(PurchaseOrderRow {
            id: order.id,
            vendor: order.vendor_id.and_then(|id| names.get(&id).cloned()),
            status: order.status.to_string(),
            lines: items.len(),
            total: order_total(&items),
            created_at: order.created_at.to_rfc3339(),
        });
    }
    Ok(rows)
}

/// Writes the part catalog as CSV, header row included.
pub async fn export_parts_csv<W: Write>(db: &DatabaseConnection, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in part_rows(db).await? {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the purchase-order book as CSV, header row included.
pub async fn export_purchase_orders_csv<W: Write>(
    db: &DatabaseConnection,
    writer: W,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in purchase_order_rows(db).await? {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_part_rows_resolve_vendor_names() -> Result<()> {
        let db = setup_test_db().await?;
        let acme = create_test_vendor(&db, "ACME Auto Parts").await?;
        create_custom_part(&db, "Brake Pad Set", "BP-100", 39.99, 3, 5, Some(acme.id)).await?;
        create_custom_part(&db, "Air Filter", "AF-300", 14.99, 2, 6, None).await?;

        let rows = part_rows(&db).await?;
        assert_eq!(rows.len(), 2);

        // Name order: Air Filter first.
        assert_eq!(rows[0].sku, "AF-300");
        assert_eq!(rows[0].vendor, None);
        assert_eq!(rows[1].sku, "BP-100");
        assert_eq!(rows[1].vendor.as_deref(), Some("ACME Auto Parts"));
        Ok(())
    }

    #[tokio::test]
    async fn test_parts_csv_has_header_and_rows() -> Result<()> {
        let db = setup_test_db().await?;
        create_custom_part(&db, "Oil Filter", "OF-200", 9.49, 12, 10, None).await?;

        let mut buf = Vec::new();
        export_parts_csv(&db, &mut buf).await?;
        let text = String::from_utf8(buf).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,name,sku,price,stock,reorder_threshold,shelf_location,vendor"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("Oil Filter"));
        assert!(row.contains("OF-200"));
        assert!(row.contains("9.49"));
        Ok(())
    }

    #[tokio::test]
    async fn test_purchase_order_rows_totals_and_status() -> Result<()> {
        let db = setup_test_db().await?;
        let vendor = create_test_vendor(&db, "GearWorks").await?;
        let part =
            create_custom_part(&db, "Spark Plug", "SP-400", 6.50, 20, 8, Some(vendor.id)).await?;
        let created = create_draft_order(&db, &[(part.id, 4)]).await?;

        let rows = purchase_order_rows(&db).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, created.order.id);
        assert_eq!(rows[0].vendor.as_deref(), Some("GearWorks"));
        assert_eq!(rows[0].status, "draft");
        assert_eq!(rows[0].lines, 1);
        assert_eq!(rows[0].total, 26.0);

        let mut buf = Vec::new();
        export_purchase_orders_csv(&db, &mut buf).await?;
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("id,vendor,status,lines,total,created_at"));
        assert!(text.contains("draft"));
        Ok(())
    }
}
