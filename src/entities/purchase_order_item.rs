//! Purchase-order line item entity.
//!
//! Each line belongs to exactly one purchase order and references one part.
//! `unit_cost` is a price snapshot captured at order-creation time, immune to
//! later part price edits. `0 <= qty_received <= qty_ordered` holds at all
//! times; receiving caps every applied delta at the remaining quantity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase-order line database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_order_items")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning purchase order
    pub purchase_order_id: i64,
    /// The part being replenished
    pub part_id: i64,
    /// Quantity ordered, positive at creation
    pub qty_ordered: i64,
    /// Quantity received so far
    pub qty_received: i64,
    /// Unit cost snapshot at order-creation time
    pub unit_cost: f64,
}

/// Defines relationships between PurchaseOrderItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one purchase order
    #[sea_orm(
        belongs_to = "super::purchase_order::Entity",
        from = "Column::PurchaseOrderId",
        to = "super::purchase_order::Column::Id"
    )]
    PurchaseOrder,
    /// Each line references one part
    #[sea_orm(
        belongs_to = "super::part::Entity",
        from = "Column::PartId",
        to = "super::part::Column::Id"
    )]
    Part,
}

impl Related<super::purchase_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrder.def()
    }
}

impl Related<super::part::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Part.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
