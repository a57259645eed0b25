//! Defines the core data models and database queries for transactions.

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction describes money that was earned or spent.
///
/// Stored in the database as the strings 'INCOME' and 'EXPENSE'.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in, e.g. a salary payment.
    Income,
    /// Money going out, e.g. a grocery shop.
    Expense,
}

impl TransactionType {
    /// The string representation used in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            other => Err(FromSqlError::Other(
                format!("unknown transaction type {other:?}").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether the transaction is an income or an expense.
    pub transaction_type: TransactionType,
    /// The amount of money spent or earned in this transaction.
    ///
    /// Always non-negative, the sign is carried by `transaction_type`.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// Free-form notes about the transaction.
    pub notes: String,
    /// When the transaction happened, normalized to UTC.
    pub posted_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        transaction_type: TransactionType,
        amount: f64,
        posted_at: OffsetDateTime,
        description: &str,
    ) -> TransactionBuilder {
        TransactionBuilder {
            transaction_type,
            amount,
            posted_at,
            description: description.to_owned(),
            notes: String::new(),
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Required fields are set up front, optional fields via the builder methods.
/// Pass the builder to [create_transaction] to insert the transaction into the
/// database and get back the stored [Transaction] with its assigned ID.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// Whether the transaction is an income or an expense.
    pub transaction_type: TransactionType,

    /// The monetary amount of the transaction.
    ///
    /// The amount is always entered as a non-negative value, whether the money
    /// came in or went out is recorded by `transaction_type`.
    ///
    /// # Examples
    /// - `150.00` - Salary deposit (income)
    /// - `45.99` - Coffee shop purchase (expense)
    /// - `1200.00` - Rent payment (expense)
    pub amount: f64,

    /// When the transaction occurred.
    ///
    /// This represents the actual transaction date (when money moved), not
    /// when it was recorded in the system. The date must not be in the future,
    /// this is enforced by the endpoint layer.
    pub posted_at: OffsetDateTime,

    /// A human-readable description of the transaction.
    ///
    /// # Examples
    /// - `"Salary - January 2026"`
    /// - `"Groceries"`
    pub description: String,

    /// Free-form notes about the transaction, e.g. who split the bill.
    ///
    /// Defaults to an empty string.
    pub notes: String,
}

impl TransactionBuilder {
    /// Set the notes for the transaction.
    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_owned();
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (transaction_type, amount, description, notes, posted_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, transaction_type, amount, description, notes, posted_at",
        )?
        .query_one(
            (
                builder.transaction_type,
                builder.amount,
                builder.description,
                builder.notes,
                builder.posted_at,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// Soft-deleted transactions are treated as missing.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an active transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, transaction_type, amount, description, notes, posted_at \
            FROM \"transaction\" WHERE id = :id AND deleted_at IS NULL",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Get the total number of active (not soft-deleted) transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\" WHERE deleted_at IS NULL;",
            [],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// Deleting a transaction sets `deleted_at` instead of removing the row, so
/// that an accidental delete can be recovered by hand.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                transaction_type TEXT NOT NULL CHECK (transaction_type IN ('INCOME', 'EXPENSE')),
                amount REAL NOT NULL,
                description TEXT NOT NULL,
                notes TEXT NOT NULL DEFAULT '',
                posted_at TEXT NOT NULL,
                deleted_at TEXT
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Index used by the transactions page to list active rows in posted order.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_posted_at \
        ON \"transaction\"(posted_at) WHERE deleted_at IS NULL;",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let transaction_type = row.get(1)?;
    let amount = row.get(2)?;
    let description = row.get(3)?;
    let notes = row.get(4)?;
    let posted_at = row.get(5)?;

    Ok(Transaction {
        id,
        transaction_type,
        amount,
        description,
        notes,
        posted_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        db::initialize,
        transaction::{Transaction, TransactionType, count_transactions, create_transaction},
    };

    use super::get_transaction;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let amount = 12.3;
        let posted_at = datetime!(2026-01-16 00:00:00 UTC);

        let result = create_transaction(
            Transaction::build(TransactionType::Expense, amount, posted_at, "Coffee"),
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.amount, amount);
                assert_eq!(transaction.transaction_type, TransactionType::Expense);
                assert_eq!(transaction.posted_at, posted_at);
                assert_eq!(transaction.notes, "");
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_stores_notes() {
        let conn = get_test_connection();
        let posted_at = datetime!(2026-01-16 00:00:00 UTC);

        let transaction = create_transaction(
            Transaction::build(TransactionType::Income, 250.0, posted_at, "Tax refund")
                .notes("Refund for overpaid income tax"),
            &conn,
        )
        .expect("Could not create transaction");

        let got = get_transaction(transaction.id, &conn).expect("Could not get transaction");

        assert_eq!(got.notes, "Refund for overpaid income tax");
        assert_eq!(got, transaction);
    }

    #[test]
    fn get_fails_with_missing_id() {
        let conn = get_test_connection();

        let result = get_transaction(42, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn get_count() {
        let conn = get_test_connection();
        let posted_at = datetime!(2026-01-16 00:00:00 UTC);
        let want_count = 20;
        for i in 1..=want_count {
            create_transaction(
                Transaction::build(TransactionType::Expense, i as f64, posted_at, ""),
                &conn,
            )
            .expect("Could not create transaction");
        }

        let got_count = count_transactions(&conn).expect("Could not get count");

        assert_eq!(want_count, got_count);
    }
}
