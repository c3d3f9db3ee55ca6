//! Core business logic - framework-agnostic inventory, purchasing, and
//! checkout operations.
//!
//! Every mutating operation here runs as a single database transaction and
//! pairs each stock change with a stock-movement ledger entry, so the live
//! counters and the audit trail always agree.

/// Part and vendor catalog operations
pub mod catalog;
/// Cart-to-sales-order checkout
pub mod checkout;
/// Read-only CSV export projections
pub mod export;
/// Append-only stock-movement ledger
pub mod ledger;
/// Purchase-order creation and state machine
pub mod purchase_order;
/// Goods receiving against purchase orders
pub mod receiving;
/// Low-stock detection and reorder suggestions
pub mod reorder;
