//! Purchase-order notification seam.
//!
//! When a purchase order is sent, the core hands a fully-populated snapshot
//! (vendor, lines, totals) to a [`SendNotifier`]. The call is fire-and-forget
//! and happens strictly after the state transition has committed: a notifier
//! failure is logged and never reverses the transition.

use crate::entities::PoStatus;
use crate::errors::Result;

/// One line of a purchase-order snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotLine {
    /// Part name at send time
    pub part_name: String,
    /// Part SKU at send time
    pub sku: String,
    /// Quantity ordered
    pub qty_ordered: i64,
    /// Unit cost captured at order creation
    pub unit_cost: f64,
    /// `qty_ordered * unit_cost`
    pub line_total: f64,
}

/// A read-only projection of a purchase order at the moment of `send`,
/// sufficient for rendering and transmission without touching the database.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOrderSnapshot {
    /// Purchase-order identifier
    pub order_id: i64,
    /// Vendor name, if the order is addressed to one
    pub vendor_name: Option<String>,
    /// Lifecycle state at snapshot time
    pub status: PoStatus,
    /// All order lines with part details resolved
    pub lines: Vec<SnapshotLine>,
    /// Sum of line totals
    pub total: f64,
}

/// Consumer of sent purchase orders. The core does not inspect the outcome
/// beyond logging a failure.
pub trait SendNotifier {
    /// Called once per successful `send`, after the transition committed.
    fn purchase_order_sent(&self, snapshot: &PurchaseOrderSnapshot) -> Result<()>;
}

/// Renders a plain-text order summary, one line per part.
#[must_use]
pub fn render_order_text(snapshot: &PurchaseOrderSnapshot) -> String {
    use std::fmt::Write as _;

    let mut out = format!(
        "Purchase order #{} for {}\n",
        snapshot.order_id,
        snapshot.vendor_name.as_deref().unwrap_or("(no vendor)")
    );
    for line in &snapshot.lines {
        let _ = writeln!(
            out,
            "  {} x {} [{}] @ {:.2} = {:.2}",
            line.qty_ordered, line.part_name, line.sku, line.unit_cost, line.line_total
        );
    }
    let _ = writeln!(out, "Total: {:.2}", snapshot.total);
    out
}

/// Email-stub notifier: renders the order and writes it to the log instead of
/// an SMTP connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailStubNotifier;

impl SendNotifier for EmailStubNotifier {
    fn purchase_order_sent(&self, snapshot: &PurchaseOrderSnapshot) -> Result<()> {
        tracing::info!(
            order_id = snapshot.order_id,
            vendor = snapshot.vendor_name.as_deref().unwrap_or("(no vendor)"),
            "purchase order sent:\n{}",
            render_order_text(snapshot)
        );
        Ok(())
    }
}
