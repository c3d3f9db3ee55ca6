//! Purchase-order business logic - creation, grouping, and the state machine.
//!
//! Orders are created in DRAFT, one per vendor group of the selected parts
//! (parts without a vendor form a first-class "unassigned" group). Lifecycle
//! transitions run as guarded single-statement updates filtered on the
//! expected source state, so two racing callers cannot both win the same
//! transition. Order totals are recomputed from lines on demand.

use std::collections::BTreeMap;

use crate::{
    entities::{
        Part, PoStatus, PurchaseOrder, PurchaseOrderItem, Vendor, part, purchase_order,
        purchase_order_item,
    },
    errors::{Error, Result},
    notify::{PurchaseOrderSnapshot, SendNotifier, SnapshotLine},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{info, warn};

/// A freshly created purchase order with its lines.
#[derive(Debug, Clone)]
pub struct CreatedOrder {
    /// The order header
    pub order: purchase_order::Model,
    /// Its line items, in insertion order
    pub items: Vec<purchase_order_item::Model>,
}

/// Creates one DRAFT purchase order per vendor group of the selection.
///
/// `selection` is a list of `(part_id, quantity)` pairs; entries with a
/// non-positive quantity are ignored and repeated part ids are aggregated.
/// The whole selection reducing to nothing is a validation failure; an
/// unknown part id is [`Error::PartNotFound`]. Each line snapshots the part's
/// current price as `unit_cost`. All orders commit in one transaction.
///
/// Returns the created orders: the vendor-less group first, then vendor
/// groups by ascending vendor id.
pub async fn create_purchase_orders(
    db: &DatabaseConnection,
    selection: &[(i64, i64)],
) -> Result<Vec<CreatedOrder>> {
    let mut quantities: BTreeMap<i64, i64> = BTreeMap::new();
    for &(part_id, qty) in selection {
        if qty > 0 {
            *quantities.entry(part_id).or_insert(0) += qty;
        }
    }
    if quantities.is_empty() {
        return Err(Error::Validation {
            message: "selection contains no positive quantities".to_string(),
        });
    }

    let txn = db.begin().await?;

    let ids: Vec<i64> = quantities.keys().copied().collect();
    let parts = Part::find()
        .filter(part::Column::Id.is_in(ids.clone()))
        .order_by_asc(part::Column::Id)
        .all(&txn)
        .await?;
    if parts.len() != ids.len() {
        let missing = ids
            .iter()
            .find(|id| !parts.iter().any(|p| p.id == **id))
            .copied()
            .unwrap_or_default();
        return Err(Error::PartNotFound { id: missing });
    }

    // Explicit grouping step: optional-vendor-id -> lines, None is a
    // first-class key for parts with no vendor assigned.
    let mut groups: BTreeMap<Option<i64>, Vec<&part::Model>> = BTreeMap::new();
    for part in &parts {
        groups.entry(part.vendor_id).or_default().push(part);
    }

    let now = chrono::Utc::now();
    let mut created = Vec::with_capacity(groups.len());
    for (vendor_id, group) in groups {
        let order = purchase_order::ActiveModel {
            vendor_id: Set(vendor_id),
            status: Set(PoStatus::Draft),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(group.len());
        for part in group {
            let item = purchase_order_item::ActiveModel {
                purchase_order_id: Set(order.id),
                part_id: Set(part.id),
                qty_ordered: Set(quantities[&part.id]),
                qty_received: Set(0),
                unit_cost: Set(part.price),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            items.push(item);
        }
        info!(
            order_id = order.id,
            vendor_id = vendor_id,
            lines = items.len(),
            "created draft purchase order"
        );
        created.push(CreatedOrder { order, items });
    }

    txn.commit().await?;
    Ok(created)
}

/// Finds a purchase order by its unique ID.
pub async fn get_purchase_order(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Option<purchase_order::Model>> {
    PurchaseOrder::find_by_id(order_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the line items of a purchase order, in insertion order.
pub async fn order_items(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Vec<purchase_order_item::Model>> {
    PurchaseOrderItem::find()
        .filter(purchase_order_item::Column::PurchaseOrderId.eq(order_id))
        .order_by_asc(purchase_order_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all purchase orders, newest first.
pub async fn list_purchase_orders(
    db: &DatabaseConnection,
) -> Result<Vec<purchase_order::Model>> {
    PurchaseOrder::find()
        .order_by_desc(purchase_order::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Order total: sum of `qty_ordered * unit_cost` across the lines.
/// Recomputed on demand, never stored.
#[must_use]
pub fn order_total(items: &[purchase_order_item::Model]) -> f64 {
    items
        .iter()
        .map(|item| item.qty_ordered as f64 * item.unit_cost)
        .sum()
}

async fn require_order(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<purchase_order::Model> {
    get_purchase_order(db, order_id)
        .await?
        .ok_or(Error::PurchaseOrderNotFound { id: order_id })
}

/// Approves a DRAFT purchase order. Any other state is an invalid transition.
pub async fn approve(db: &DatabaseConnection, order_id: i64) -> Result<purchase_order::Model> {
    let order = require_order(db, order_id).await?;
    if order.status != PoStatus::Draft {
        return Err(Error::InvalidTransition {
            action: "approve",
            from: order.status,
        });
    }

    // Guarded on the source state so a racing caller cannot double-apply.
    let result = PurchaseOrder::update_many()
        .col_expr(purchase_order::Column::Status, Expr::value(PoStatus::Approved))
        .col_expr(
            purchase_order::Column::ApprovedAt,
            Expr::value(chrono::Utc::now()),
        )
        .filter(purchase_order::Column::Id.eq(order_id))
        .filter(purchase_order::Column::Status.eq(PoStatus::Draft))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        let current = require_order(db, order_id).await?;
        return Err(Error::InvalidTransition {
            action: "approve",
            from: current.status,
        });
    }

    require_order(db, order_id).await
}

/// Sends a DRAFT or APPROVED purchase order to its vendor.
///
/// The state transition commits first; the notifier is invoked afterwards
/// with a full snapshot and its failure is logged, never propagated, so
/// notification latency or errors cannot hold locks or revert the send.
pub async fn send(
    db: &DatabaseConnection,
    order_id: i64,
    notifier: &dyn SendNotifier,
) -> Result<purchase_order::Model> {
    let order = require_order(db, order_id).await?;
    if !matches!(order.status, PoStatus::Draft | PoStatus::Approved) {
        return Err(Error::InvalidTransition {
            action: "send",
            from: order.status,
        });
    }

    let result = PurchaseOrder::update_many()
        .col_expr(purchase_order::Column::Status, Expr::value(PoStatus::Sent))
        .col_expr(
            purchase_order::Column::SentAt,
            Expr::value(chrono::Utc::now()),
        )
        .filter(purchase_order::Column::Id.eq(order_id))
        .filter(
            purchase_order::Column::Status.is_in([PoStatus::Draft, PoStatus::Approved]),
        )
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        let current = require_order(db, order_id).await?;
        return Err(Error::InvalidTransition {
            action: "send",
            from: current.status,
        });
    }

    let sent = require_order(db, order_id).await?;

    // Best-effort notification, after the commit.
    match snapshot(db, order_id).await {
        Ok(snap) => {
            if let Err(err) = notifier.purchase_order_sent(&snap) {
                warn!(order_id, error = %err, "purchase-order notification failed");
            }
        }
        Err(err) => warn!(order_id, error = %err, "could not build purchase-order snapshot"),
    }

    Ok(sent)
}

/// Cancels a purchase order from any state except RECEIVED.
pub async fn cancel(db: &DatabaseConnection, order_id: i64) -> Result<purchase_order::Model> {
    let order = require_order(db, order_id).await?;
    if order.status == PoStatus::Received {
        return Err(Error::InvalidTransition {
            action: "cancel",
            from: order.status,
        });
    }

    let result = PurchaseOrder::update_many()
        .col_expr(purchase_order::Column::Status, Expr::value(PoStatus::Canceled))
        .filter(purchase_order::Column::Id.eq(order_id))
        .filter(purchase_order::Column::Status.ne(PoStatus::Received))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        let current = require_order(db, order_id).await?;
        return Err(Error::InvalidTransition {
            action: "cancel",
            from: current.status,
        });
    }

    require_order(db, order_id).await
}

/// Builds the full read-only snapshot of a purchase order: vendor name,
/// lines with part names and SKUs resolved, per-line and order totals.
pub async fn snapshot(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<PurchaseOrderSnapshot> {
    let order = require_order(db, order_id).await?;
    let items = order_items(db, order_id).await?;

    let vendor_name = match order.vendor_id {
        Some(vendor_id) => Vendor::find_by_id(vendor_id)
            .one(db)
            .await?
            .map(|v| v.name),
        None => None,
    };

    let part_ids: Vec<i64> = items.iter().map(|item| item.part_id).collect();
    let parts = Part::find()
        .filter(part::Column::Id.is_in(part_ids))
        .all(db)
        .await?;

    let lines: Vec<SnapshotLine> = items
        .iter()
        .map(|item| {
            let part = parts.iter().find(|p| p.id == item.part_id);
            SnapshotLine {
                part_name: part.map_or_else(String::new, |p| p.name.clone()),
                sku: part.map_or_else(String::new, |p| p.sku.clone()),
                qty_ordered: item.qty_ordered,
                unit_cost: item.unit_cost,
                line_total: item.qty_ordered as f64 * item.unit_cost,
            }
        })
        .collect();
    let total = lines.iter().map(|line| line.line_total).sum();

    Ok(PurchaseOrderSnapshot {
        order_id: order.id,
        vendor_name,
        status: order.status,
        lines,
        total,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use std::cell::RefCell;

    use super::*;
    use crate::core::catalog;
    use crate::notify::EmailStubNotifier;
    use crate::test_utils::*;

    /// Captures snapshots handed to the notifier.
    #[derive(Default)]
    struct RecordingNotifier {
        snapshots: RefCell<Vec<PurchaseOrderSnapshot>>,
    }

    impl SendNotifier for RecordingNotifier {
        fn purchase_order_sent(&self, snapshot: &PurchaseOrderSnapshot) -> Result<()> {
            self.snapshots.borrow_mut().push(snapshot.clone());
            Ok(())
        }
    }

    /// Always fails, to prove send never rolls back on notifier errors.
    struct FailingNotifier;

    impl SendNotifier for FailingNotifier {
        fn purchase_order_sent(&self, _snapshot: &PurchaseOrderSnapshot) -> Result<()> {
            Err(Error::Config {
                message: "smtp unreachable".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_create_groups_by_vendor_with_unassigned_group() -> Result<()> {
        let db = setup_test_db().await?;
        let acme = create_test_vendor(&db, "ACME Auto Parts").await?;
        let turbo = create_test_vendor(&db, "Turbo Supply Co.").await?;

        let brake =
            create_custom_part(&db, "Brake Pad Set", "BP-100", 39.99, 3, 5, Some(acme.id)).await?;
        let oil =
            create_custom_part(&db, "Oil Filter", "OF-200", 9.49, 12, 10, Some(acme.id)).await?;
        let air =
            create_custom_part(&db, "Air Filter", "AF-300", 14.99, 2, 6, Some(turbo.id)).await?;
        let loose = create_custom_part(&db, "Shop Rag", "SR-001", 1.99, 0, 5, None).await?;

        let created = create_purchase_orders(
            &db,
            &[(brake.id, 10), (oil.id, 8), (air.id, 10), (loose.id, 10)],
        )
        .await?;

        assert_eq!(created.len(), 3);

        // Vendor-less group first, then by vendor id.
        assert_eq!(created[0].order.vendor_id, None);
        assert_eq!(created[0].items.len(), 1);
        assert_eq!(created[0].items[0].part_id, loose.id);

        assert_eq!(created[1].order.vendor_id, Some(acme.id));
        assert_eq!(created[1].items.len(), 2);

        assert_eq!(created[2].order.vendor_id, Some(turbo.id));
        assert_eq!(created[2].items.len(), 1);

        for order in &created {
            assert_eq!(order.order.status, PoStatus::Draft);
            for item in &order.items {
                assert_eq!(item.qty_received, 0);
            }
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_create_snapshots_unit_cost() -> Result<()> {
        let db = setup_test_db().await?;
        let part = create_custom_part(&db, "Spark Plug", "SP-400", 6.50, 20, 8, None).await?;

        let created = create_draft_order(&db, &[(part.id, 4)]).await?;
        assert_eq!(created.items[0].unit_cost, 6.50);

        // A later price edit must not touch the captured cost.
        catalog::update_part(&db, part.id, "Spark Plug".to_string(), 9.99, 8, None).await?;
        let items = order_items(&db, created.order.id).await?;
        assert_eq!(items[0].unit_cost, 6.50);
        assert_eq!(order_total(&items), 26.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_aggregates_repeated_parts_and_drops_nonpositive() -> Result<()> {
        let (db, part) = setup_with_part().await?;

        let created =
            create_purchase_orders(&db, &[(part.id, 3), (part.id, 2), (part.id, 0), (part.id, -5)])
                .await?;
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].items.len(), 1);
        assert_eq!(created[0].items[0].qty_ordered, 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_rejects_zero_net_quantity() -> Result<()> {
        let (db, part) = setup_with_part().await?;

        let result = create_purchase_orders(&db, &[(part.id, 0), (part.id, -3)]).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let result = create_purchase_orders(&db, &[]).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_part() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_purchase_orders(&db, &[(42, 5)]).await;
        assert!(matches!(result.unwrap_err(), Error::PartNotFound { id: 42 }));
        Ok(())
    }

    #[tokio::test]
    async fn test_approve_moves_draft_to_approved() -> Result<()> {
        let (db, part) = setup_with_part().await?;
        let created = create_draft_order(&db, &[(part.id, 5)]).await?;

        let approved = approve(&db, created.order.id).await?;
        assert_eq!(approved.status, PoStatus::Approved);
        assert!(approved.approved_at.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_approve_on_sent_order_fails() -> Result<()> {
        let (db, part) = setup_with_part().await?;
        let created = create_draft_order(&db, &[(part.id, 5)]).await?;
        send(&db, created.order.id, &EmailStubNotifier).await?;

        let result = approve(&db, created.order.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidTransition {
                action: "approve",
                from: PoStatus::Sent,
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_send_from_draft_and_from_approved() -> Result<()> {
        let (db, part) = setup_with_part().await?;

        // Draft -> Sent directly.
        let first = create_draft_order(&db, &[(part.id, 2)]).await?;
        let sent = send(&db, first.order.id, &EmailStubNotifier).await?;
        assert_eq!(sent.status, PoStatus::Sent);
        assert!(sent.sent_at.is_some());

        // Draft -> Approved -> Sent.
        let second = create_draft_order(&db, &[(part.id, 2)]).await?;
        approve(&db, second.order.id).await?;
        let sent = send(&db, second.order.id, &EmailStubNotifier).await?;
        assert_eq!(sent.status, PoStatus::Sent);
        Ok(())
    }

    #[tokio::test]
    async fn test_send_notifies_with_full_snapshot() -> Result<()> {
        let db = setup_test_db().await?;
        let vendor = create_test_vendor(&db, "GearWorks").await?;
        let part =
            create_custom_part(&db, "Oil Filter", "OF-220", 8.49, 50, 20, Some(vendor.id)).await?;
        let created = create_draft_order(&db, &[(part.id, 6)]).await?;

        let notifier = RecordingNotifier::default();
        send(&db, created.order.id, &notifier).await?;

        let snapshots = notifier.snapshots.borrow();
        assert_eq!(snapshots.len(), 1);
        let snap = &snapshots[0];
        assert_eq!(snap.order_id, created.order.id);
        assert_eq!(snap.vendor_name.as_deref(), Some("GearWorks"));
        assert_eq!(snap.status, PoStatus::Sent);
        assert_eq!(snap.lines.len(), 1);
        assert_eq!(snap.lines[0].sku, "OF-220");
        assert_eq!(snap.lines[0].qty_ordered, 6);
        assert!((snap.total - 50.94).abs() < 1e-9);
        Ok(())
    }

    #[tokio::test]
    async fn test_notifier_failure_does_not_revert_send() -> Result<()> {
        let (db, part) = setup_with_part().await?;
        let created = create_draft_order(&db, &[(part.id, 1)]).await?;

        let sent = send(&db, created.order.id, &FailingNotifier).await?;
        assert_eq!(sent.status, PoStatus::Sent);

        let reloaded = get_purchase_order(&db, created.order.id).await?.unwrap();
        assert_eq!(reloaded.status, PoStatus::Sent);
        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_approved_order() -> Result<()> {
        let (db, part) = setup_with_part().await?;
        let created = create_draft_order(&db, &[(part.id, 5)]).await?;
        approve(&db, created.order.id).await?;

        let canceled = cancel(&db, created.order.id).await?;
        assert_eq!(canceled.status, PoStatus::Canceled);
        assert!(canceled.status.is_terminal());
        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_received_order_fails() -> Result<()> {
        let (db, part) = setup_with_part().await?;
        let created = create_sent_order(&db, &[(part.id, 2)]).await?;
        crate::core::receiving::receive(&db, created.order.id, &[(created.items[0].id, 2)])
            .await?;

        let order = get_purchase_order(&db, created.order.id).await?.unwrap();
        assert_eq!(order.status, PoStatus::Received);
        assert!(order.status.is_terminal());

        let result = cancel(&db, created.order.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidTransition {
                action: "cancel",
                from: PoStatus::Received,
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_sent_and_partially_received_orders() -> Result<()> {
        let (db, part) = setup_with_part().await?;
        let created = create_sent_order(&db, &[(part.id, 10)]).await?;

        crate::core::receiving::receive(&db, created.order.id, &[(created.items[0].id, 4)])
            .await?;
        let canceled = cancel(&db, created.order.id).await?;
        assert_eq!(canceled.status, PoStatus::Canceled);
        Ok(())
    }

    #[tokio::test]
    async fn test_order_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = approve(&db, 404).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::PurchaseOrderNotFound { id: 404 }
        ));
        Ok(())
    }
}
