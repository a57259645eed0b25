//! Defines the route handler for the page that displays transactions grouped
//! by month and day.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, endpoints};

use super::{
    grouping::group_by_month_and_day,
    models::TransactionListItem,
    query::{SortOrder, get_active_transactions},
    view::transactions_view,
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render an overview of the user's transactions, grouped by calendar month
/// and then by calendar day.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_active_transactions(SortOrder::Descending, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    drop(connection);

    let redirect_param = build_redirect_param(endpoints::TRANSACTIONS_VIEW);
    let redirect_param = redirect_param.as_deref();
    let list_items = transactions
        .into_iter()
        .map(|transaction| TransactionListItem::new_from_transaction(transaction, redirect_param))
        .collect::<Vec<_>>();

    let grouped = group_by_month_and_day(list_items);

    Ok(transactions_view(grouped).into_response())
}

fn build_redirect_param(redirect_url: &str) -> Option<String> {
    serde_urlencoded::to_string([("redirect_url", &redirect_url)])
        .inspect_err(|error| {
            tracing::error!(
                "Could not set redirect URL {redirect_url} due to encoding error: {error}"
            );
        })
        .ok()
}
