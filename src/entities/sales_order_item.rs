//! Sales-order line entity - A full snapshot of what was sold.
//!
//! Every line captures the part's name, SKU, and unit price at checkout time
//! so historical orders stay accurate even if the part is later edited or
//! removed from the catalog.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sales-order line database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales_order_items")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning sales order
    pub sales_order_id: i64,
    /// The part that was sold (for cross-reference, not display)
    pub part_id: i64,
    /// Part name at checkout time
    pub name_snapshot: String,
    /// Part SKU at checkout time
    pub sku_snapshot: String,
    /// Unit price at checkout time
    pub unit_price: f64,
    /// Quantity sold
    pub quantity: i64,
    /// unit_price * quantity at checkout time
    pub line_total: f64,
}

/// Defines relationships between SalesOrderItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one sales order
    #[sea_orm(
        belongs_to = "super::sales_order::Entity",
        from = "Column::SalesOrderId",
        to = "super::sales_order::Column::Id"
    )]
    SalesOrder,
    /// Each line references the part it snapshotted
    #[sea_orm(
        belongs_to = "super::part::Entity",
        from = "Column::PartId",
        to = "super::part::Column::Id"
    )]
    Part,
}

impl Related<super::sales_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SalesOrder.def()
    }
}

impl Related<super::part::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Part.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
