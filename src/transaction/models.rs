//! Shared view-model structs for the transactions page.

use time::Date;

use crate::{
    database_id::TransactionId,
    endpoints,
    transaction::core::{Transaction, TransactionType},
};

/// Renders a transaction as an expandable list row.
#[derive(Debug, PartialEq, Clone)]
pub(crate) struct TransactionListItem {
    /// The ID of the transaction.
    pub(crate) id: TransactionId,
    /// Whether the transaction is an income or an expense.
    pub(crate) transaction_type: TransactionType,
    /// The amount of money spent or earned in this transaction.
    pub(crate) amount: f64,
    /// The calendar date the transaction was posted on.
    pub(crate) posted_date: Date,
    /// A text description of what the transaction was for.
    pub(crate) description: String,
    /// Free-form notes about the transaction.
    pub(crate) notes: String,
    /// The path to the page for editing this transaction
    pub(crate) edit_url: String,
    /// The API path to delete this transaction
    pub(crate) delete_url: String,
}

impl TransactionListItem {
    pub(crate) fn new_from_transaction(
        transaction: Transaction,
        redirect_param: Option<&str>,
    ) -> Self {
        let mut edit_url =
            endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);

        if let Some(redirect_param) = redirect_param {
            edit_url = format!("{edit_url}?{redirect_param}");
        }

        Self {
            id: transaction.id,
            transaction_type: transaction.transaction_type,
            amount: transaction.amount,
            posted_date: transaction.posted_at.date(),
            description: transaction.description,
            notes: transaction.notes,
            edit_url,
            delete_url: endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::transaction::core::{Transaction, TransactionType};

    use super::TransactionListItem;

    fn transaction() -> Transaction {
        Transaction {
            id: 7,
            transaction_type: TransactionType::Expense,
            amount: 12.3,
            description: "Coffee".to_owned(),
            notes: String::new(),
            posted_at: datetime!(2026-01-16 00:00:00 UTC),
        }
    }

    #[test]
    fn builds_edit_and_delete_urls() {
        let item = TransactionListItem::new_from_transaction(transaction(), None);

        assert_eq!(item.edit_url, "/transactions/7/edit");
        assert_eq!(item.delete_url, "/api/transactions/7");
    }

    #[test]
    fn appends_redirect_param_to_edit_url() {
        let item = TransactionListItem::new_from_transaction(
            transaction(),
            Some("redirect_url=%2Ftransactions"),
        );

        assert_eq!(
            item.edit_url,
            "/transactions/7/edit?redirect_url=%2Ftransactions"
        );
    }

    #[test]
    fn takes_date_part_of_posted_timestamp() {
        let item = TransactionListItem::new_from_transaction(transaction(), None);

        assert_eq!(item.posted_date, time::macros::date!(2026 - 01 - 16));
    }
}
