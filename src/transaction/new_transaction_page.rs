use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::Markup;
use time::OffsetDateTime;

use crate::{
    AppState, Error, endpoints,
    html::{FORM_CONTAINER_STYLE, base, dollar_input_styles, loading_spinner},
    navigation::NavBar,
    timezone::get_local_offset,
    transaction::core::TransactionType,
};

use super::form::{TransactionFormDefaults, transaction_form_fields};

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

fn new_transaction_page(defaults: &TransactionFormDefaults<'_>) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();

    let content = maud::html! {
        (nav_bar)

        main class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold my-4" { "New Transaction" }

            form
                hx-post=(endpoints::TRANSACTIONS_API)
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
                    "Create"
                }
            }
        }
    };

    base("New Transaction", &[dollar_input_styles()], &content)
}

/// Renders the page for creating a transaction.
pub async fn get_new_transaction_page(State(state): State<NewTransactionPageState>) -> Response {
    let local_timezone = match get_local_offset(&state.local_timezone) {
        Some(offset) => offset,
        None => return Error::InvalidTimezoneError(state.local_timezone).into_response(),
    };

    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();

    new_transaction_page(&TransactionFormDefaults {
        transaction_type: TransactionType::Expense,
        amount: None,
        date: today,
        description: None,
        notes: None,
        max_date: today,
        autofocus_amount: true,
    })
    .into_response()
}
