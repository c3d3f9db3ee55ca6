//! Receiving engine - applies vendor deliveries against sent purchase orders.
//!
//! A receipt is a set of per-line quantity deltas. Each delta is capped at
//! the line's remaining open quantity, so replaying the same receipt is
//! harmless: the second pass caps every line to zero and reports
//! [`ReceiveOutcome::NothingToReceive`] without writing anything. That
//! includes receipts against an already RECEIVED order. Line updates, stock
//! increments, ledger entries, and the order-status recompute all commit in
//! one transaction.

use std::collections::BTreeMap;

use crate::{
    core::ledger::{self, REF_PURCHASE_ORDER},
    entities::{
        MovementReason, Part, PoStatus, PurchaseOrder, PurchaseOrderItem, part, purchase_order,
        purchase_order_item,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::info;

/// One line's applied portion of a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedLine {
    /// Purchase-order line id
    pub item_id: i64,
    /// Part the quantity was booked onto
    pub part_id: i64,
    /// Quantity actually applied after capping at the open amount
    pub qty: i64,
}

/// Result of a receipt attempt against a purchase order.
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiveOutcome {
    /// At least one unit was booked in; carries the refreshed order header.
    Applied {
        /// Order after the status recompute
        order: purchase_order::Model,
        /// Per-line applied quantities, in line order
        applied: Vec<AppliedLine>,
    },
    /// Every requested quantity capped to zero; nothing was written.
    NothingToReceive,
}

/// Books a delivery against a purchase order.
///
/// `deltas` maps line ids to received quantities; non-positive entries are
/// ignored and repeated line ids are summed. A line id that does not belong
/// to the order is a validation error. Quantities beyond a line's open
/// amount are silently capped. After applying, the order moves to
/// PARTIALLY_RECEIVED or RECEIVED depending on whether every line is fully
/// received; `received_at` is stamped only on the transition to RECEIVED.
///
/// Only APPROVED, SENT, and PARTIALLY_RECEIVED orders are receivable. A
/// receipt against an already RECEIVED order reports
/// [`ReceiveOutcome::NothingToReceive`]; DRAFT and CANCELED orders are an
/// invalid transition.
pub async fn receive(
    db: &DatabaseConnection,
    order_id: i64,
    deltas: &[(i64, i64)],
) -> Result<ReceiveOutcome> {
    let mut requested: BTreeMap<i64, i64> = BTreeMap::new();
    for &(item_id, qty) in deltas {
        if qty > 0 {
            *requested.entry(item_id).or_insert(0) += qty;
        }
    }

    let txn = db.begin().await?;

    let order = PurchaseOrder::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or(Error::PurchaseOrderNotFound { id: order_id })?;
    if order.status == PoStatus::Received {
        // Every line is already at its ordered quantity, so any replay caps
        // to zero across the board.
        txn.rollback().await?;
        return Ok(ReceiveOutcome::NothingToReceive);
    }
    if !order.status.is_receivable() {
        return Err(Error::InvalidTransition {
            action: "receive",
            from: order.status,
        });
    }

    let items = PurchaseOrderItem::find()
        .filter(purchase_order_item::Column::PurchaseOrderId.eq(order_id))
        .order_by_asc(purchase_order_item::Column::Id)
        .all(&txn)
        .await?;

    if let Some(unknown) = requested.keys().find(|id| !items.iter().any(|i| i.id == **id)) {
        return Err(Error::Validation {
            message: format!("line {unknown} does not belong to purchase order {order_id}"),
        });
    }

    let mut applied = Vec::new();
    for item in &items {
        let Some(&qty) = requested.get(&item.id) else {
            continue;
        };
        let open = item.qty_ordered - item.qty_received;
        let booked = qty.min(open);
        if booked <= 0 {
            continue;
        }

        // Guarded so a concurrent receipt cannot push the line past its
        // ordered quantity; a lost race just means that receipt won.
        let result = PurchaseOrderItem::update_many()
            .col_expr(
                purchase_order_item::Column::QtyReceived,
                Expr::col(purchase_order_item::Column::QtyReceived).add(booked),
            )
            .filter(purchase_order_item::Column::Id.eq(item.id))
            .filter(
                purchase_order_item::Column::QtyReceived.lte(item.qty_ordered - booked),
            )
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            continue;
        }

        Part::update_many()
            .col_expr(
                part::Column::Stock,
                Expr::col(part::Column::Stock).add(booked),
            )
            .filter(part::Column::Id.eq(item.part_id))
            .exec(&txn)
            .await?;
        ledger::record_movement(
            &txn,
            item.part_id,
            booked,
            MovementReason::PoReceive,
            REF_PURCHASE_ORDER,
            Some(order_id),
        )
        .await?;
        applied.push(AppliedLine {
            item_id: item.id,
            part_id: item.part_id,
            qty: booked,
        });
    }

    if applied.is_empty() {
        txn.rollback().await?;
        return Ok(ReceiveOutcome::NothingToReceive);
    }

    // Recompute the order state from the lines as they now stand.
    let lines = PurchaseOrderItem::find()
        .filter(purchase_order_item::Column::PurchaseOrderId.eq(order_id))
        .all(&txn)
        .await?;
    let fully_received = lines.iter().all(|l| l.qty_received >= l.qty_ordered);

    let mut update = PurchaseOrder::update_many().filter(purchase_order::Column::Id.eq(order_id));
    if fully_received {
        update = update
            .col_expr(purchase_order::Column::Status, Expr::value(PoStatus::Received))
            .col_expr(
                purchase_order::Column::ReceivedAt,
                Expr::value(chrono::Utc::now()),
            );
    } else {
        update = update.col_expr(
            purchase_order::Column::Status,
            Expr::value(PoStatus::PartiallyReceived),
        );
    }
    update.exec(&txn).await?;

    txn.commit().await?;

    let order = PurchaseOrder::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or(Error::PurchaseOrderNotFound { id: order_id })?;
    info!(
        order_id,
        status = %order.status,
        lines = applied.len(),
        "booked purchase-order receipt"
    );
    Ok(ReceiveOutcome::Applied { order, applied })
}
