//! Part entity - Represents one physical part in the catalog.
//!
//! Each part has a unique SKU, a unit price, the live stock counter, a
//! reorder threshold, and an optional vendor linkage. Stock is only mutated
//! through guarded atomic updates paired with a stock-movement ledger entry;
//! the `stock >= 0` invariant is enforced by those guards.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Part database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parts")]
pub struct Model {
    /// Unique identifier for the part
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name (e.g., "Brake Pad Set")
    pub name: String,
    /// Stock-keeping unit, unique across the catalog
    #[sea_orm(unique)]
    pub sku: String,
    /// Unit price in dollars, never negative
    pub price: f64,
    /// Units currently on the shelf, never negative
    pub stock: i64,
    /// Stock level at or below which the part is flagged for replenishment
    pub reorder_threshold: i64,
    /// Physical shelf location (e.g., "A1")
    pub shelf_location: Option<String>,
    /// Supplying vendor, if one is assigned
    pub vendor_id: Option<i64>,
}

/// Defines relationships between Part and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each part may belong to one vendor
    #[sea_orm(
        belongs_to = "super::vendor::Entity",
        from = "Column::VendorId",
        to = "super::vendor::Column::Id"
    )]
    Vendor,
    /// One part appears on many purchase-order lines
    #[sea_orm(has_many = "super::purchase_order_item::Entity")]
    PurchaseOrderItems,
    /// One part has many ledger entries
    #[sea_orm(has_many = "super::stock_movement::Entity")]
    StockMovements,
}

impl Related<super::vendor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl Related<super::purchase_order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrderItems.def()
    }
}

impl Related<super::stock_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
