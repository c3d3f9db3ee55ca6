//! Stock-movement entity - The append-only stock ledger.
//!
//! One row per stock change, carrying the signed delta, the reason, and a
//! reference to the causing event (purchase-order receipt, sale, or manual
//! adjustment). Rows are never updated or deleted once written; the ledger is
//! the authoritative audit trail for every stock change.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Why a stock movement happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum MovementReason {
    /// Goods received against a purchase order (positive delta)
    #[sea_orm(string_value = "po_receive")]
    PoReceive,
    /// Customer checkout (negative delta)
    #[sea_orm(string_value = "sale")]
    Sale,
    /// Manual correction, either direction
    #[sea_orm(string_value = "adjust")]
    Adjust,
}

/// Stock-movement database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_movements")]
pub struct Model {
    /// Unique identifier for the ledger entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The part whose stock changed
    pub part_id: i64,
    /// Signed quantity change
    pub qty_delta: i64,
    /// Why the stock changed
    pub reason: MovementReason,
    /// Kind of the causing record ("purchase_order", "sales_order", "manual")
    pub reference_type: String,
    /// Identifier of the causing record, when one exists
    pub reference_id: Option<i64>,
    /// When the movement was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between StockMovement and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each movement belongs to one part
    #[sea_orm(
        belongs_to = "super::part::Entity",
        from = "Column::PartId",
        to = "super::part::Column::Id"
    )]
    Part,
}

impl Related<super::part::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Part.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
