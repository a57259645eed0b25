//! Database initialization for the application.

use rusqlite::Connection;

use crate::{auth::create_user_table, transaction::create_transaction_table};

/// Create the tables for the application's domain models.
///
/// This function is idempotent and safe to call on an existing database.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    create_user_table(connection)?;
    create_transaction_table(connection)?;

    Ok(())
}
