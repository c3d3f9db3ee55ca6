//! Purchase-order entity - One vendor-facing replenishment request.
//!
//! A purchase order moves through a fixed lifecycle:
//! DRAFT -> APPROVED -> SENT -> {PARTIALLY_RECEIVED, RECEIVED}, with any
//! non-RECEIVED state allowed to move to CANCELED. Transitions happen only
//! through `core::purchase_order` and `core::receiving`. The order total is
//! recomputed from its lines on demand and never stored.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase-order lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum PoStatus {
    /// Just created, editable selection
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Approved for transmission
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Transmitted to the vendor
    #[sea_orm(string_value = "sent")]
    Sent,
    /// Some lines received, remainder still open
    #[sea_orm(string_value = "partially_received")]
    PartiallyReceived,
    /// Every line fully received (terminal)
    #[sea_orm(string_value = "received")]
    Received,
    /// Canceled before full receipt (terminal)
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

impl PoStatus {
    /// Terminal states admit no further transitions.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Received | Self::Canceled)
    }

    /// States from which goods may still be received against the order.
    #[must_use]
    pub fn is_receivable(self) -> bool {
        matches!(self, Self::Approved | Self::Sent | Self::PartiallyReceived)
    }
}

impl std::fmt::Display for PoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
            Self::Sent => "sent",
            Self::PartiallyReceived => "partially_received",
            Self::Received => "received",
            Self::Canceled => "canceled",
        })
    }
}

/// Purchase-order database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    /// Unique identifier for the purchase order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Receiving vendor; None for the "unassigned" group
    pub vendor_id: Option<i64>,
    /// Current lifecycle state
    pub status: PoStatus,
    /// When the order was created
    pub created_at: DateTimeUtc,
    /// When the order was approved, if it has been
    pub approved_at: Option<DateTimeUtc>,
    /// When the order was sent to the vendor, if it has been
    pub sent_at: Option<DateTimeUtc>,
    /// When the last outstanding line was received, if all have been
    pub received_at: Option<DateTimeUtc>,
}

/// Defines relationships between PurchaseOrder and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each purchase order may be addressed to one vendor
    #[sea_orm(
        belongs_to = "super::vendor::Entity",
        from = "Column::VendorId",
        to = "super::vendor::Column::Id"
    )]
    Vendor,
    /// One purchase order has many line items
    #[sea_orm(has_many = "super::purchase_order_item::Entity")]
    Items,
}

impl Related<super::vendor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl Related<super::purchase_order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
