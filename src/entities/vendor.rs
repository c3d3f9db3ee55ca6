//! Vendor entity - Represents a supplier of parts.
//!
//! Each vendor has a unique name plus contact fields, owns zero or more parts
//! and zero or more purchase orders. The name uniqueness is a storage-level
//! constraint, not just an application pre-check.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Vendor database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    /// Unique identifier for the vendor
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Vendor display name, unique across the catalog
    #[sea_orm(unique)]
    pub name: String,
    /// Email address orders are sent to
    pub contact_email: Option<String>,
    /// Contact phone number
    pub phone: Option<String>,
}

/// Defines relationships between Vendor and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One vendor supplies many parts
    #[sea_orm(has_many = "super::part::Entity")]
    Parts,
    /// One vendor receives many purchase orders
    #[sea_orm(has_many = "super::purchase_order::Entity")]
    PurchaseOrders,
}

impl Related<super::part::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parts.def()
    }
}

impl Related<super::purchase_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
