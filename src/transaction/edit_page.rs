use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::Markup;
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    html::{FORM_CONTAINER_STYLE, base, dollar_input_styles, loading_spinner},
    navigation::NavBar,
    timezone::get_local_offset,
    transaction::{core::Transaction, get_transaction},
};

use super::form::{TransactionFormDefaults, transaction_form_fields};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for fetching the transaction.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the edit transaction page.
#[derive(Debug, Deserialize)]
pub struct EditPageQuery {
    /// The page to return to after the edit is saved.
    pub redirect_url: Option<String>,
}

fn edit_transaction_page(
    put_url: &str,
    defaults: &TransactionFormDefaults<'_>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_TRANSACTION_VIEW).into_html();

    let content = maud::html! {
        (nav_bar)

        main class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold my-4" { "Edit Transaction" }

            form
                hx-put=(put_url)
                hx-indicator="#indicator"
                hx-disabled-elt="#submit-button"
                class="space-y-4 w-full"
            {
                (transaction_form_fields(defaults))

                button
                    type="submit" id="submit-button" tabindex="0"
                    class="w-full px-4 py-2 bg-blue-500 dark:bg-blue-600 disabled:bg-blue-700
                        hover:enabled:bg-blue-600 hover:enabled:dark:bg-blue-700 text-white rounded"
                {
                    span class="inline htmx-indicator" id="indicator"
                    {
                        (loading_spinner())
                    }
                    "Save"
                }
            }
        }
    };

    base("Edit Transaction", &[dollar_input_styles()], &content)
}

/// Renders the page for editing a transaction with the stored values pre-filled.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Path(transaction_id): Path<TransactionId>,
    Query(query): Query<EditPageQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction: Transaction = get_transaction(transaction_id, &connection)
        .inspect_err(|error| {
            tracing::error!("Failed to retrieve transaction {transaction_id}: {error}")
        })?;
    drop(connection);

    let local_timezone = match get_local_offset(&state.local_timezone) {
        Some(offset) => offset,
        None => return Err(Error::InvalidTimezoneError(state.local_timezone)),
    };
    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();

    let mut put_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction_id);
    if let Some(redirect_url) = &query.redirect_url {
        match serde_urlencoded::to_string([("redirect_url", redirect_url)]) {
            Ok(param) => put_url = format!("{put_url}?{param}"),
            Err(error) => {
                tracing::error!("Could not encode redirect URL {redirect_url}: {error}");
            }
        }
    }

    Ok(edit_transaction_page(
        &put_url,
        &TransactionFormDefaults {
            transaction_type: transaction.transaction_type,
            amount: Some(transaction.amount),
            date: transaction.posted_at.date(),
            description: Some(&transaction.description),
            notes: Some(&transaction.notes),
            max_date: today,
            autofocus_amount: false,
        },
    )
    .into_response())
}
