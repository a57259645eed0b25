//! Transaction management for the finance tracking application.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and soft-deleting transactions
//! - Grouping of transactions by calendar month and day for the list page
//! - View handlers for transaction-related web pages

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod grouping;
mod models;
mod new_transaction_page;
mod query;
mod transactions_page;
mod view;

pub use core::{
    Transaction, TransactionBuilder, TransactionType, create_transaction,
    create_transaction_table, get_transaction, map_transaction_row,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use new_transaction_page::get_new_transaction_page;
pub use transactions_page::get_transactions_page;

#[cfg(test)]
pub use core::count_transactions;
