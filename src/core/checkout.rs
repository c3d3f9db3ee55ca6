//! Cart checkout - turns a cart into a paid sales order.
//!
//! The cart itself is a plain `part id -> quantity` map owned by the caller;
//! nothing here persists carts. Checkout resolves the cart against the
//! catalog, validates stock, and then writes the order header, line
//! snapshots, stock decrements, and ledger entries in one transaction. The
//! cart is cleared only after the transaction commits, so a failed checkout
//! leaves it intact for the caller to retry.

use std::collections::HashMap;

use crate::{
    core::ledger::{self, REF_SALES_ORDER},
    entities::{
        MovementReason, Part, SalesOrder, SalesOrderItem, part, sales_order, sales_order_item,
    },
    errors::{Error, Result},
};
use sea_orm::{ActiveModelTrait, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::info;

/// A customer cart: part id mapped to desired quantity.
pub type Cart = HashMap<i64, i64>;

/// Optional buyer details captured on the order header.
#[derive(Debug, Clone, Default)]
pub struct BuyerInfo {
    /// Buyer display name
    pub name: Option<String>,
    /// Buyer contact email
    pub email: Option<String>,
}

/// The committed order with its line snapshots.
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    /// Order header, status `"paid"`, total filled in
    pub order: sales_order::Model,
    /// Line snapshots in part-id order
    pub items: Vec<sales_order_item::Model>,
}

/// Adds a quantity of a part to the cart; non-positive quantities are ignored.
pub fn add_to_cart(cart: &mut Cart, part_id: i64, qty: i64) {
    if qty > 0 {
        *cart.entry(part_id).or_insert(0) += qty;
    }
}

/// Checks out the cart, creating a paid sales order.
///
/// Entries whose part no longer exists, and entries with a non-positive
/// quantity, are dropped before validation. An empty resolved cart is a
/// validation error. Every line must be fully coverable by current stock or
/// the whole checkout aborts with [`Error::InsufficientStock`] and no rows
/// are written. Line snapshots capture the part's name, SKU, and price at
/// checkout time. On success the cart is cleared.
pub async fn checkout(
    db: &DatabaseConnection,
    cart: &mut Cart,
    buyer: &BuyerInfo,
) -> Result<CheckoutReceipt> {
    let mut wanted: Vec<(i64, i64)> = cart
        .iter()
        .filter(|&(_, &qty)| qty > 0)
        .map(|(&id, &qty)| (id, qty))
        .collect();
    wanted.sort_unstable();

    let txn = db.begin().await?;

    let ids: Vec<i64> = wanted.iter().map(|&(id, _)| id).collect();
    let parts = Part::find()
        .filter(part::Column::Id.is_in(ids))
        .order_by_asc(part::Column::Id)
        .all(&txn)
        .await?;

    // Stale cart entries for deleted parts are dropped, not fatal.
    let lines: Vec<(&part::Model, i64)> = parts
        .iter()
        .filter_map(|p| {
            wanted
                .iter()
                .find(|&&(id, _)| id == p.id)
                .map(|&(_, qty)| (p, qty))
        })
        .collect();
    if lines.is_empty() {
        return Err(Error::Validation {
            message: "cart is empty".to_string(),
        });
    }

    for &(part, qty) in &lines {
        if qty > part.stock {
            return Err(Error::InsufficientStock {
                name: part.name.clone(),
                requested: qty,
                available: part.stock,
            });
        }
    }

    let order = sales_order::ActiveModel {
        status: Set("paid".to_string()),
        buyer_name: Set(buyer.name.clone()),
        buyer_email: Set(buyer.email.clone()),
        total_amount: Set(0.0),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(lines.len());
    let mut total = 0.0;
    for &(part, qty) in &lines {
        // The guard re-checks stock at write time; a racing sale that
        // drained the part between validation and here aborts this one.
        let result = Part::update_many()
            .col_expr(part::Column::Stock, Expr::col(part::Column::Stock).sub(qty))
            .filter(part::Column::Id.eq(part.id))
            .filter(part::Column::Stock.gte(qty))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(Error::InsufficientStock {
                name: part.name.clone(),
                requested: qty,
                available: part.stock,
            });
        }

        let line_total = part.price * qty as f64;
        let item = sales_order_item::ActiveModel {
            sales_order_id: Set(order.id),
            part_id: Set(part.id),
            name_snapshot: Set(part.name.clone()),
            sku_snapshot: Set(part.sku.clone()),
            unit_price: Set(part.price),
            quantity: Set(qty),
            line_total: Set(line_total),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        ledger::record_movement(
            &txn,
            part.id,
            -qty,
            MovementReason::Sale,
            REF_SALES_ORDER,
            Some(order.id),
        )
        .await?;
        total += line_total;
        items.push(item);
    }

    let mut header: sales_order::ActiveModel = order.into();
    header.total_amount = Set(total);
    let order = header.update(&txn).await?;

    txn.commit().await?;
    cart.clear();

    info!(
        order_id = order.id,
        lines = items.len(),
        total,
        "checked out cart"
    );
    Ok(CheckoutReceipt { order, items })
}

/// Finds a sales order by its unique ID.
pub async fn get_sales_order(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Option<sales_order::Model>> {
    SalesOrder::find_by_id(order_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the line snapshots of a sales order.
pub async fn sales_order_items(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Vec<sales_order_item::Model>> {
    SalesOrderItem::find()
        .filter(sales_order_item::Column::SalesOrderId.eq(order_id))
        .order_by_asc(sales_order_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
