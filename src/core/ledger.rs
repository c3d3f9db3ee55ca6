//! Stock-movement ledger - the append-only journal of stock deltas.
//!
//! Every stock mutation in the crate goes through [`record_movement`] inside
//! the same transaction that updates the part's counter, so there is never a
//! ledger entry without a corresponding counter change or vice versa. There
//! is deliberately no update or delete API for movements.

use crate::{
    entities::{MovementReason, StockMovement, stock_movement},
    errors::Result,
};
use sea_orm::{ConnectionTrait, QueryOrder, Set, prelude::*};

/// Reference type for movements caused by a purchase-order receipt.
pub const REF_PURCHASE_ORDER: &str = "purchase_order";
/// Reference type for movements caused by a customer checkout.
pub const REF_SALES_ORDER: &str = "sales_order";
/// Reference type for manual adjustments with no causing record.
pub const REF_MANUAL: &str = "manual";

/// Appends one movement to the ledger within the caller's transaction.
///
/// Callers must pass the same connection (usually a `DatabaseTransaction`)
/// they use for the paired stock-counter update so both commit or abort
/// together.
pub async fn record_movement<C>(
    conn: &C,
    part_id: i64,
    qty_delta: i64,
    reason: MovementReason,
    reference_type: &str,
    reference_id: Option<i64>,
) -> Result<stock_movement::Model>
where
    C: ConnectionTrait,
{
    let movement = stock_movement::ActiveModel {
        part_id: Set(part_id),
        qty_delta: Set(qty_delta),
        reason: Set(reason),
        reference_type: Set(reference_type.to_string()),
        reference_id: Set(reference_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    movement.insert(conn).await.map_err(Into::into)
}

/// Retrieves the full movement history for one part, newest first.
pub async fn movements_for_part(
    db: &DatabaseConnection,
    part_id: i64,
) -> Result<Vec<stock_movement::Model>> {
    StockMovement::find()
        .filter(stock_movement::Column::PartId.eq(part_id))
        .order_by_desc(stock_movement::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sums all recorded deltas for one part.
///
/// For any part created with initial stock `s0`,
/// `s0 + ledger_delta_for_part(..) == current stock` holds at all times.
pub async fn ledger_delta_for_part(db: &DatabaseConnection, part_id: i64) -> Result<i64> {
    let movements = StockMovement::find()
        .filter(stock_movement::Column::PartId.eq(part_id))
        .all(db)
        .await?;
    Ok(movements.iter().map(|m| m.qty_delta).sum())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_record_movement_and_history_order() -> Result<()> {
        let (db, part) = setup_with_part().await?;

        record_movement(&db, part.id, 5, MovementReason::Adjust, REF_MANUAL, None).await?;
        record_movement(
            &db,
            part.id,
            -2,
            MovementReason::Sale,
            REF_SALES_ORDER,
            Some(7),
        )
        .await?;

        let history = movements_for_part(&db, part.id).await?;
        assert_eq!(history.len(), 2);

        // Newest first
        assert_eq!(history[0].qty_delta, -2);
        assert_eq!(history[0].reason, MovementReason::Sale);
        assert_eq!(history[0].reference_type, REF_SALES_ORDER);
        assert_eq!(history[0].reference_id, Some(7));
        assert_eq!(history[1].qty_delta, 5);
        assert_eq!(history[1].reason, MovementReason::Adjust);

        Ok(())
    }

    #[tokio::test]
    async fn test_ledger_delta_sums_signed_quantities() -> Result<()> {
        let (db, part) = setup_with_part().await?;

        record_movement(
            &db,
            part.id,
            10,
            MovementReason::PoReceive,
            REF_PURCHASE_ORDER,
            Some(1),
        )
        .await?;
        record_movement(
            &db,
            part.id,
            -3,
            MovementReason::Sale,
            REF_SALES_ORDER,
            Some(2),
        )
        .await?;
        record_movement(&db, part.id, -1, MovementReason::Adjust, REF_MANUAL, None).await?;

        assert_eq!(ledger_delta_for_part(&db, part.id).await?, 6);
        Ok(())
    }

    #[tokio::test]
    async fn test_ledger_is_scoped_per_part() -> Result<()> {
        let db = setup_test_db().await?;
        let part_a = create_test_part(&db, "Part A", "PA-1").await?;
        let part_b = create_test_part(&db, "Part B", "PB-1").await?;

        record_movement(&db, part_a.id, 4, MovementReason::Adjust, REF_MANUAL, None).await?;
        record_movement(&db, part_b.id, 9, MovementReason::Adjust, REF_MANUAL, None).await?;

        assert_eq!(ledger_delta_for_part(&db, part_a.id).await?, 4);
        assert_eq!(ledger_delta_for_part(&db, part_b.id).await?, 9);
        Ok(())
    }
}
