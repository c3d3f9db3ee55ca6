//! Sales-order entity - One completed customer checkout.
//!
//! Payment is assumed already authorized before checkout runs, so orders are
//! created directly in the `paid` status. `total_amount` is computed at
//! creation as the sum of line totals.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sales-order database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales_orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Order status (e.g., "paid")
    pub status: String,
    /// Optional buyer name from the checkout form
    pub buyer_name: Option<String>,
    /// Optional buyer email from the checkout form
    pub buyer_email: Option<String>,
    /// Sum of line totals, fixed at creation time
    pub total_amount: f64,
    /// When the order was placed
    pub created_at: DateTimeUtc,
}

/// Defines relationships between SalesOrder and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One sales order has many snapshot line items
    #[sea_orm(has_many = "super::sales_order_item::Entity")]
    Items,
}

impl Related<super::sales_order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
