use std::sync::{Arc, Mutex};

use axum::{
    debug_handler,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::{Connection, params};
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error, database_id::TransactionId, endpoints, timezone::get_local_offset,
    transaction::core::TransactionType,
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for editing a transaction.
#[derive(Debug, Deserialize)]
pub struct EditTransactionForm {
    type_: TransactionType,
    amount: f64,
    date: Date,
    description: String,
    #[serde(default)]
    notes: String,
}

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    redirect_url: Option<String>,
}

/// A route handler that replaces the stored fields of a transaction,
/// then redirects back to the page the user came from.
#[debug_handler]
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Query(query_params): Query<QueryParams>,
    Form(form): Form<EditTransactionForm>,
) -> Response {
    let Some(local_timezone) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    if form.date > OffsetDateTime::now_utc().to_offset(local_timezone).date() {
        tracing::error!("Tried to edit a transaction to have a future date");

        return Error::FutureDate(form.date).into_alert_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_transaction(transaction_id, &form, &connection) {
        Ok(0) => {
            tracing::error!(
                "Could not update transaction {transaction_id}: update returned zero rows affected"
            );
            return Error::UpdateMissingTransaction.into_alert_response();
        }
        Ok(_) => {}
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    }

    let redirect_url = query_params
        .redirect_url
        .unwrap_or(endpoints::TRANSACTIONS_VIEW.to_owned());

    (HxRedirect(redirect_url), StatusCode::SEE_OTHER).into_response()
}

type RowsAffected = usize;

fn update_transaction(
    id: TransactionId,
    transaction: &EditTransactionForm,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE \"transaction\"
        SET \
            transaction_type = ?1, \
            amount = ?2, \
            posted_at = ?3, \
            description = ?4, \
            notes = ?5 \
        WHERE id = ?6 AND deleted_at IS NULL;",
            params![
                transaction.type_,
                transaction.amount,
                transaction.date.midnight().assume_utc(),
                transaction.description,
                transaction.notes,
                id,
            ],
        )
        .map_err(Error::from)
}

#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, Query, State},
        http::{HeaderValue, StatusCode},
    };
    use axum_extra::extract::Form;
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;
    use time::macros::{date, datetime};

    use crate::{
        initialize_db,
        transaction::{Transaction, TransactionType, create_transaction, get_transaction},
    };

    use super::{
        EditTransactionForm, EditTransactionState, QueryParams, edit_transaction_endpoint,
    };

    fn must_create_test_connection() -> Connection {
        let connection =
            Connection::open_in_memory().expect("could not create in-memory SQLite database");
        initialize_db(&connection).expect("could not initialize test DB");

        connection
    }

    #[tokio::test]
    async fn can_update_transaction() {
        let conn = must_create_test_connection();
        create_transaction(
            Transaction::build(
                TransactionType::Expense,
                1.23,
                datetime!(2025-10-27 00:00:00 UTC),
                "test",
            )
            .notes("original notes"),
            &conn,
        )
        .expect("could not create test transaction");
        let state = EditTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };
        let want_transaction = Transaction {
            id: 1,
            transaction_type: TransactionType::Income,
            amount: 3.21,
            description: "foo".to_owned(),
            notes: "updated notes".to_owned(),
            posted_at: datetime!(2025-10-28 00:00:00 UTC),
        };
        let form = EditTransactionForm {
            type_: want_transaction.transaction_type,
            amount: want_transaction.amount,
            date: date!(2025 - 10 - 28),
            description: want_transaction.description.clone(),
            notes: want_transaction.notes.clone(),
        };
        let redirect_url = "/transactions".to_owned();

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Path(want_transaction.id),
            Query(QueryParams {
                redirect_url: Some(redirect_url.clone()),
            }),
            Form(form),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT),
            Some(&HeaderValue::from_str(&redirect_url).unwrap())
        );
        let got_transaction = get_transaction(
            want_transaction.id,
            &state.db_connection.lock().expect("could not acquire lock"),
        )
        .expect("could not get test transaction");
        assert_eq!(want_transaction, got_transaction);
    }

    #[tokio::test]
    async fn update_missing_transaction_returns_not_found() {
        let conn = must_create_test_connection();
        let state = EditTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };
        let form = EditTransactionForm {
            type_: TransactionType::Expense,
            amount: 1.0,
            date: date!(2025 - 10 - 28),
            description: String::new(),
            notes: String::new(),
        };

        let response = edit_transaction_endpoint(
            State(state),
            Path(42),
            Query(QueryParams { redirect_url: None }),
            Form(form),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cannot_update_soft_deleted_transaction() {
        let conn = must_create_test_connection();
        let posted_at = datetime!(2025-10-27 00:00:00 UTC);
        let transaction = create_transaction(
            Transaction::build(TransactionType::Expense, 1.23, posted_at, "test"),
            &conn,
        )
        .expect("could not create test transaction");
        conn.execute(
            "UPDATE \"transaction\" SET deleted_at = ?1 WHERE id = ?2",
            (posted_at, transaction.id),
        )
        .unwrap();
        let state = EditTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };
        let form = EditTransactionForm {
            type_: TransactionType::Expense,
            amount: 99.0,
            date: date!(2025 - 10 - 28),
            description: String::new(),
            notes: String::new(),
        };

        let response = edit_transaction_endpoint(
            State(state),
            Path(transaction.id),
            Query(QueryParams { redirect_url: None }),
            Form(form),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cannot_update_transaction_to_future_date() {
        let conn = must_create_test_connection();
        let posted_at = datetime!(2025-10-27 00:00:00 UTC);
        let transaction = create_transaction(
            Transaction::build(TransactionType::Expense, 1.23, posted_at, "test"),
            &conn,
        )
        .expect("could not create test transaction");
        let state = EditTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };
        let form = EditTransactionForm {
            type_: TransactionType::Expense,
            amount: 99.0,
            date: time::OffsetDateTime::now_utc().date() + time::Duration::days(2),
            description: String::new(),
            notes: String::new(),
        };

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Path(transaction.id),
            Query(QueryParams { redirect_url: None }),
            Form(form),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let got_transaction = get_transaction(
            transaction.id,
            &state.db_connection.lock().expect("could not acquire lock"),
        )
        .expect("could not get test transaction");
        assert_eq!(got_transaction.posted_at, posted_at, "transaction should be unchanged");
    }
}
