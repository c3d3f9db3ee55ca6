//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod part;
pub mod purchase_order;
pub mod purchase_order_item;
pub mod sales_order;
pub mod sales_order_item;
pub mod stock_movement;
pub mod vendor;

// Re-export specific types to avoid conflicts
pub use part::{Column as PartColumn, Entity as Part, Model as PartModel};
pub use purchase_order::{
    Column as PurchaseOrderColumn, Entity as PurchaseOrder, Model as PurchaseOrderModel, PoStatus,
};
pub use purchase_order_item::{
    Column as PurchaseOrderItemColumn, Entity as PurchaseOrderItem, Model as PurchaseOrderItemModel,
};
pub use sales_order::{Column as SalesOrderColumn, Entity as SalesOrder, Model as SalesOrderModel};
pub use sales_order_item::{
    Column as SalesOrderItemColumn, Entity as SalesOrderItem, Model as SalesOrderItemModel,
};
pub use stock_movement::{
    Column as StockMovementColumn, Entity as StockMovement, Model as StockMovementModel,
    MovementReason,
};
pub use vendor::{Column as VendorColumn, Entity as Vendor, Model as VendorModel};
