use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{Html, IntoResponse, Response},
};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{AppState, Error, database_id::TransactionId};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction, responds with an alert on failure.
///
/// The transaction row is kept and marked with a deletion timestamp, so it can
/// be recovered by hand if it was deleted by accident. Deleted rows are
/// invisible to every other query.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_transaction(transaction_id, &connection) {
        Ok(0) => Error::DeleteMissingTransaction.into_alert_response(),
        // The status code has to be 200 OK or HTMX will not remove the list row.
        Ok(_) => Html("").into_response(),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

type RowsAffected = usize;

fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE \"transaction\" SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
            (OffsetDateTime::now_utc(), id),
        )
        .map_err(|err| err.into())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error, initialize_db,
        transaction::{
            Transaction, TransactionType, count_transactions, create_transaction, get_transaction,
        },
    };

    use super::{DeleteTransactionState, delete_transaction, delete_transaction_endpoint};

    fn must_create_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();

        connection
    }

    #[test]
    fn delete_hides_transaction_but_keeps_the_row() {
        let connection = must_create_test_connection();
        let transaction = create_transaction(
            Transaction::build(
                TransactionType::Expense,
                1.23,
                datetime!(2025-10-26 00:00:00 UTC),
                "Test",
            ),
            &connection,
        )
        .unwrap();

        let rows_affected = delete_transaction(transaction.id, &connection).unwrap();

        assert_eq!(rows_affected, 1);
        assert_eq!(
            get_transaction(transaction.id, &connection),
            Err(Error::NotFound)
        );
        assert_eq!(count_transactions(&connection), Ok(0));

        // The row itself must survive with a deletion timestamp.
        let raw_count: u32 = connection
            .query_row("SELECT COUNT(id) FROM \"transaction\"", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(raw_count, 1, "soft delete should keep the row");
    }

    #[test]
    fn delete_twice_affects_no_rows() {
        let connection = must_create_test_connection();
        let transaction = create_transaction(
            Transaction::build(
                TransactionType::Expense,
                1.23,
                datetime!(2025-10-26 00:00:00 UTC),
                "Test",
            ),
            &connection,
        )
        .unwrap();

        assert_eq!(delete_transaction(transaction.id, &connection), Ok(1));
        assert_eq!(delete_transaction(transaction.id, &connection), Ok(0));
    }

    #[tokio::test]
    async fn delete_endpoint_returns_ok_for_existing_transaction() {
        let connection = must_create_test_connection();
        let transaction = create_transaction(
            Transaction::build(
                TransactionType::Expense,
                1.23,
                datetime!(2025-10-26 00:00:00 UTC),
                "Test",
            ),
            &connection,
        )
        .unwrap();
        let state = DeleteTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_transaction_endpoint(State(state), Path(transaction.id)).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn delete_endpoint_returns_not_found_for_missing_transaction() {
        let state = DeleteTransactionState {
            db_connection: Arc::new(Mutex::new(must_create_test_connection())),
        };

        let response = delete_transaction_endpoint(State(state), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
