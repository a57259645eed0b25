//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error, endpoints,
    timezone::get_local_offset,
    transaction::{Transaction, TransactionType, core::create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// Whether the transaction is an income or an expense.
    pub type_: TransactionType,
    /// The value of the transaction in dollars.
    pub amount: f64,
    /// The date when the transaction occurred.
    pub date: Date,
    /// Text detailing the transaction.
    pub description: String,
    /// Free-form notes about the transaction.
    #[serde(default)]
    pub notes: String,
}

/// A route handler for creating a new transaction, redirects to transactions view on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let Some(local_timezone) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    let now_local_time = OffsetDateTime::now_utc().to_offset(local_timezone);

    if form.date > now_local_time.date() {
        tracing::error!("Tried to create a transaction with a future date");

        return Error::FutureDate(form.date).into_alert_response();
    }

    let posted_at = form.date.midnight().assume_utc();
    let transaction = Transaction::build(form.type_, form.amount, posted_at, &form.description)
        .notes(&form.notes);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_transaction(transaction, &connection) {
        tracing::error!("could not create transaction: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{body::Body, extract::State, http::Response, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime};

    use crate::{
        db::initialize,
        transaction::{TransactionType, get_transaction},
    };

    use super::{CreateTransactionState, TransactionForm, create_transaction_endpoint};

    fn get_test_state() -> CreateTransactionState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        CreateTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let state = get_test_state();

        let form = TransactionForm {
            type_: TransactionType::Expense,
            amount: 12.3,
            date: OffsetDateTime::now_utc().date(),
            description: "test transaction".to_string(),
            notes: String::new(),
        };

        let response = create_transaction_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_redirects_to_transactions_view(response);

        // Verify the transaction was actually created by getting it by ID
        // We know the first transaction will have ID 1
        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        assert_eq!(transaction.amount, 12.3);
        assert_eq!(transaction.transaction_type, TransactionType::Expense);
        assert_eq!(transaction.description, "test transaction");
    }

    #[tokio::test]
    async fn can_create_transaction_with_notes() {
        let state = get_test_state();

        let form = TransactionForm {
            type_: TransactionType::Income,
            amount: 25.50,
            date: OffsetDateTime::now_utc().date(),
            description: "test transaction with notes".to_string(),
            notes: "split the bill".to_string(),
        };
        let response = create_transaction_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_redirects_to_transactions_view(response);

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        assert_eq!(transaction.notes, "split the bill");
        assert_eq!(transaction.transaction_type, TransactionType::Income);
    }

    #[tokio::test]
    async fn create_sets_posted_at_to_midnight_utc() {
        let state = get_test_state();
        let date = OffsetDateTime::now_utc().date();

        let form = TransactionForm {
            type_: TransactionType::Expense,
            amount: 1.0,
            date,
            description: String::new(),
            notes: String::new(),
        };
        create_transaction_endpoint(State(state.clone()), Form(form)).await;

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        assert_eq!(transaction.posted_at, date.midnight().assume_utc());
    }

    #[tokio::test]
    async fn create_rejects_future_date() {
        let state = get_test_state();
        let future_date = OffsetDateTime::now_utc().date() + Duration::days(2);

        let form = TransactionForm {
            type_: TransactionType::Expense,
            amount: 1.0,
            date: future_date,
            description: String::new(),
            notes: String::new(),
        };
        let response = create_transaction_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let connection = state.db_connection.lock().unwrap();
        let count = crate::transaction::count_transactions(&connection).unwrap();
        assert_eq!(count, 0, "no transaction should be created, got {count}");
    }

    #[track_caller]
    fn assert_redirects_to_transactions_view(response: Response<Body>) {
        let location = response
            .headers()
            .get(HX_REDIRECT)
            .expect("expected response to have the header hx-redirect");
        assert_eq!(
            location, "/transactions",
            "got redirect to {location:?}, want redirect to /transactions"
        );
    }
}
