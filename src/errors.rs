//! Unified error types for the stockroom crate.
//!
//! Business-rule failures carry enough context (offending SKU, current vs
//! requested purchase-order state, requested vs available quantity) for the
//! caller to decide whether to fix input and retry. Storage-layer surprises
//! surface as [`Error::Database`].

use thiserror::Error;

use crate::entities::purchase_order::PoStatus;

/// All failure modes surfaced by the core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing required input; no state change occurred.
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong while loading configuration
        message: String,
    },

    /// SKU collision on part create/edit; the original part is untouched.
    #[error("Duplicate SKU: {sku}")]
    DuplicateSku {
        /// The SKU that already exists
        sku: String,
    },

    /// Vendor name collision on create.
    #[error("Duplicate vendor name: {name}")]
    DuplicateVendorName {
        /// The vendor name that already exists
        name: String,
    },

    /// Checkout or manual adjustment asked for more than is on the shelf.
    #[error("Insufficient stock for {name}: requested {requested}, available {available}")]
    InsufficientStock {
        /// Name of the offending part
        name: String,
        /// Quantity the caller asked for
        requested: i64,
        /// Quantity actually available
        available: i64,
    },

    /// A purchase-order action was attempted from a state that forbids it.
    #[error("Cannot {action} a purchase order in state {from}")]
    InvalidTransition {
        /// The action that was attempted ("approve", "send", ...)
        action: &'static str,
        /// The state the purchase order was in
        from: PoStatus,
    },

    /// Referenced part does not exist.
    #[error("Part not found: {id}")]
    PartNotFound {
        /// The part identifier that was looked up
        id: i64,
    },

    /// Referenced vendor does not exist.
    #[error("Vendor not found: {id}")]
    VendorNotFound {
        /// The vendor identifier that was looked up
        id: i64,
    },

    /// Referenced purchase order does not exist.
    #[error("Purchase order not found: {id}")]
    PurchaseOrderNotFound {
        /// The purchase-order identifier that was looked up
        id: i64,
    },

    /// Vendor deletion is blocked while non-terminal purchase orders exist.
    #[error("Vendor '{name}' still has {open} open purchase order(s)")]
    VendorHasOpenOrders {
        /// Name of the vendor
        name: String,
        /// How many non-terminal purchase orders reference it
        open: u64,
    },

    /// Unexpected storage-layer failure (constraint raced past a pre-check,
    /// connectivity loss). The enclosing transaction was rolled back.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error while reading configuration or writing exports.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error during export.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
