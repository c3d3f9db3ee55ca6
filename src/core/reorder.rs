//! Reorder advisor - low-stock detection and replenishment suggestions.
//!
//! Pure functions over catalog snapshots plus one read-only query. A part
//! counts as low-stock when its stock is at or below the reorder threshold;
//! the suggested quantity restocks to twice the threshold (or at least one
//! unit past the current level), so the suggestion is strictly positive for
//! every qualifying part. Integer arithmetic only.

use crate::{
    entities::{Part, part},
    errors::Result,
};
use sea_orm::{QueryOrder, prelude::*, sea_query::Expr};

/// True iff the part's stock is at or below its reorder threshold.
#[must_use]
pub fn is_low_stock(part: &part::Model) -> bool {
    part.stock <= part.reorder_threshold
}

/// Suggested replenishment quantity for a part; 0 when it is not low-stock.
#[must_use]
pub fn suggested_reorder_qty(part: &part::Model) -> i64 {
    if !is_low_stock(part) {
        return 0;
    }
    let target = (part.reorder_threshold * 2).max(part.stock + 1);
    (target - part.stock).max(1)
}

/// Retrieves all parts at or below their reorder threshold, ordered by name.
///
/// The comparison runs database-side so the result is consistent with the
/// stock counters at query time.
pub async fn low_stock_parts(db: &DatabaseConnection) -> Result<Vec<part::Model>> {
    Part::find()
        .filter(Expr::col(part::Column::Stock).lte(Expr::col(part::Column::ReorderThreshold)))
        .order_by_asc(part::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn part_with(stock: i64, reorder_threshold: i64) -> part::Model {
        part::Model {
            id: 1,
            name: "Brake Pad Set".to_string(),
            sku: "BP-100".to_string(),
            price: 39.99,
            stock,
            reorder_threshold,
            shelf_location: None,
            vendor_id: None,
        }
    }

    #[test]
    fn test_low_stock_boundary() {
        // Equal counts as low-stock; one above does not.
        assert!(is_low_stock(&part_with(10, 10)));
        assert!(!is_low_stock(&part_with(11, 10)));
        assert!(is_low_stock(&part_with(0, 0)));
    }

    #[test]
    fn test_suggested_qty_restocks_to_double_threshold() {
        // threshold=10, stock=4: target max(20, 5) = 20, suggestion 16
        assert_eq!(suggested_reorder_qty(&part_with(4, 10)), 16);
        // threshold=5, stock=5: boundary case, suggestion max(10-5, 1) = 5
        assert_eq!(suggested_reorder_qty(&part_with(5, 5)), 5);
    }

    #[test]
    fn test_suggested_qty_zero_when_not_low() {
        assert_eq!(suggested_reorder_qty(&part_with(11, 10)), 0);
        assert_eq!(suggested_reorder_qty(&part_with(100, 5)), 0);
    }

    #[test]
    fn test_suggested_qty_strictly_positive_for_low_stock() {
        // threshold=0, stock=0: target max(0, 1) = 1, suggestion 1
        assert_eq!(suggested_reorder_qty(&part_with(0, 0)), 1);
        // Large stock equal to threshold still suggests at least one unit.
        assert_eq!(suggested_reorder_qty(&part_with(50, 50)), 50);
    }

    #[tokio::test]
    async fn test_low_stock_parts_query() -> Result<()> {
        let db = setup_test_db().await?;
        let low = create_custom_part(&db, "Air Filter", "AF-300", 14.99, 2, 6, None).await?;
        let _ok = create_custom_part(&db, "Spark Plug", "SP-400", 6.50, 20, 8, None).await?;
        let boundary = create_custom_part(&db, "Oil Filter", "OF-200", 9.49, 10, 10, None).await?;

        let flagged = low_stock_parts(&db).await?;
        assert_eq!(flagged.len(), 2);

        // Ordered by name
        assert_eq!(flagged[0].id, low.id);
        assert_eq!(flagged[1].id, boundary.id);
        Ok(())
    }
}
