//! HTML rendering for the transactions page.

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    endpoints,
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, LIST_HEADER_STYLE, LIST_ITEM_STYLE, LIST_SUBHEADER_STYLE,
        PAGE_CONTAINER_STYLE, base, format_currency,
    },
    navigation::NavBar,
    transaction::core::TransactionType,
};

use super::{
    grouping::MonthGroup,
    models::TransactionListItem,
};

/// The max number of graphemes to display in the transaction list rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

fn amount_class(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => "text-emerald-600 dark:text-emerald-400",
        TransactionType::Expense => "text-gray-900 dark:text-white",
    }
}

fn signed_amount(transaction_type: TransactionType, amount: f64) -> String {
    match transaction_type {
        TransactionType::Income => format!("+{}", format_currency(amount)),
        TransactionType::Expense => format!("-{}", format_currency(amount)),
    }
}

fn truncate_description(description: &str) -> String {
    let graphemes: Vec<&str> = description.graphemes(true).collect();

    if graphemes.len() <= MAX_DESCRIPTION_GRAPHEMES {
        description.to_owned()
    } else {
        format!("{}...", graphemes[..MAX_DESCRIPTION_GRAPHEMES].concat())
    }
}

pub(crate) fn transactions_view(grouped_transactions: Vec<MonthGroup>) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let transactions_empty = grouped_transactions.is_empty();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-3xl lg:mx-auto" id="transactions-content"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE)
                    {
                        "Refresh"
                    }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "Add Transaction"
                    }
                }

                @if transactions_empty {
                    p data-empty-state="true" class="py-8 text-center text-gray-500 dark:text-gray-400"
                    {
                        "No transactions yet. Add your first transaction to get started."
                    }
                }

                @for month in &grouped_transactions {
                    section
                        data-month-group=(month.label())
                        class="rounded bg-gray-50 dark:bg-gray-800 overflow-hidden"
                    {
                        header class=(LIST_HEADER_STYLE)
                        {
                            h2 class="font-semibold" { (month.label()) }

                            span
                            {
                                span class="text-emerald-600 dark:text-emerald-400"
                                {
                                    "+" (format_currency(month.totals.income))
                                }

                                " / "

                                span
                                {
                                    "-" (format_currency(month.totals.expenses))
                                }
                            }
                        }

                        @for day in &month.days {
                            p class=(LIST_SUBHEADER_STYLE) data-day-group=(day.date)
                            {
                                (day.label())
                            }

                            ul
                            {
                                @for transaction in &day.transactions {
                                    (transaction_list_item(transaction))
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Transactions", &[], &content)
}

fn transaction_list_item(transaction: &TransactionListItem) -> Markup {
    html! {
        li
            id={ "transaction-" (transaction.id) }
            data-transaction-row="true"
            class=(LIST_ITEM_STYLE)
        {
            details
            {
                summary class="flex justify-between cursor-pointer list-none"
                {
                    span { (truncate_description(&transaction.description)) }

                    span class=(amount_class(transaction.transaction_type))
                    {
                        (signed_amount(transaction.transaction_type, transaction.amount))
                    }
                }

                div class="pt-1"
                {
                    hr class="border-gray-200 dark:border-gray-700";

                    div class="pl-3 py-1 flex gap-4"
                    {
                        a href=(transaction.edit_url) class=(LINK_STYLE) { "Edit" }

                        button
                            type="button"
                            class=(BUTTON_DELETE_STYLE)
                            hx-delete=(transaction.delete_url)
                            hx-target="closest li"
                            hx-swap="outerHTML"
                            hx-confirm="Delete this transaction?"
                        {
                            "Delete"
                        }
                    }

                    hr class="border-gray-200 dark:border-gray-700";

                    div class="pl-3 py-1 text-sm text-gray-700 dark:text-gray-300"
                    {
                        "Description: " (transaction.description)
                        br;
                        "Notes: " (transaction.notes)
                        br;
                        "Posted: " (transaction.posted_date)
                    }
                }
            }
        }
    }
}
