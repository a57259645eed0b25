//! Database query helpers for the transactions page.

use rusqlite::Connection;

use crate::Error;

use super::core::{Transaction, map_transaction_row};

/// The order to sort transactions in a query.
pub(crate) enum SortOrder {
    /// Sort in order of increasing posted date.
    #[allow(dead_code)]
    Ascending,
    /// Sort in order of decreasing posted date.
    Descending,
}

/// Get all active (not soft-deleted) transactions sorted by posted date.
///
/// # Arguments
/// * `sort_order` - Sort direction for the posted_at field
/// * `connection` - Database connection reference
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Transaction row mapping fails
pub(crate) fn get_active_transactions(
    sort_order: SortOrder,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let order_clause = match sort_order {
        SortOrder::Ascending => "ORDER BY posted_at ASC",
        SortOrder::Descending => "ORDER BY posted_at DESC",
    };

    // Sort by posted date, and then ID to keep transaction order stable after updates
    let query = format!(
        "SELECT id, transaction_type, amount, description, notes, posted_at \
        FROM \"transaction\" \
        WHERE deleted_at IS NULL \
        {}, id ASC",
        order_clause
    );

    connection
        .prepare(&query)?
        .query_map([], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Duration, macros::datetime};

    use crate::{
        db::initialize,
        transaction::{Transaction, TransactionType, create_transaction},
    };

    use super::{SortOrder, get_active_transactions};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn get_active_transactions_orders_by_posted_date_descending() {
        let conn = get_test_connection();
        let newest = datetime!(2026-01-16 00:00:00 UTC);

        for i in 0..5 {
            create_transaction(
                Transaction::build(
                    TransactionType::Expense,
                    (i + 1) as f64,
                    newest - Duration::days(i),
                    &format!("transaction #{i}"),
                ),
                &conn,
            )
            .unwrap();
        }

        let got = get_active_transactions(SortOrder::Descending, &conn).unwrap();

        assert_eq!(got.len(), 5, "got {} transactions, want 5", got.len());
        for window in got.windows(2) {
            assert!(
                window[0].posted_at >= window[1].posted_at,
                "transactions should be in descending posted order, got {:?} before {:?}",
                window[0].posted_at,
                window[1].posted_at
            );
        }
    }

    #[test]
    fn get_active_transactions_breaks_ties_by_id() {
        let conn = get_test_connection();
        let posted_at = datetime!(2026-01-16 00:00:00 UTC);

        for i in 1..=3 {
            create_transaction(
                Transaction::build(TransactionType::Income, i as f64, posted_at, ""),
                &conn,
            )
            .unwrap();
        }

        let got = get_active_transactions(SortOrder::Descending, &conn).unwrap();

        let ids: Vec<_> = got.iter().map(|transaction| transaction.id).collect();
        assert_eq!(ids, vec![1, 2, 3], "same-day transactions should keep insertion order");
    }

    #[test]
    fn get_active_transactions_excludes_soft_deleted_rows() {
        let conn = get_test_connection();
        let posted_at = datetime!(2026-01-16 00:00:00 UTC);

        let keep = create_transaction(
            Transaction::build(TransactionType::Expense, 1.0, posted_at, "keep"),
            &conn,
        )
        .unwrap();
        let delete = create_transaction(
            Transaction::build(TransactionType::Expense, 2.0, posted_at, "delete"),
            &conn,
        )
        .unwrap();

        conn.execute(
            "UPDATE \"transaction\" SET deleted_at = ?1 WHERE id = ?2",
            (posted_at, delete.id),
        )
        .unwrap();

        let got = get_active_transactions(SortOrder::Descending, &conn).unwrap();

        assert_eq!(got.len(), 1, "got {} transactions, want 1", got.len());
        assert_eq!(got[0].id, keep.id);
    }
}
