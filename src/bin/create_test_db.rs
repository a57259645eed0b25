use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use moolah::{
    PasswordHash, Transaction, TransactionType, ValidatedPassword, create_transaction,
    initialize_db,
};

/// A utility for creating a test database for the Moolah server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;

    conn.execute(
        "INSERT INTO user (password) VALUES (?1)",
        (password_hash.to_string(),),
    )?;

    println!("Creating test transactions...");

    let today = OffsetDateTime::now_utc();
    let sample_transactions = [
        (TransactionType::Income, 3200.0, 30, "Salary", "January pay"),
        (TransactionType::Expense, 1450.0, 28, "Rent", ""),
        (TransactionType::Expense, 86.4, 21, "Groceries", ""),
        (TransactionType::Expense, 4.5, 14, "Coffee", "Flat white and a muffin"),
        (TransactionType::Expense, 120.0, 7, "Power bill", ""),
        (TransactionType::Income, 25.0, 3, "Sold old keyboard", ""),
        (TransactionType::Expense, 92.1, 0, "Groceries", ""),
    ];

    for (transaction_type, amount, days_ago, description, notes) in sample_transactions {
        create_transaction(
            Transaction::build(
                transaction_type,
                amount,
                today - Duration::days(days_ago),
                description,
            )
            .notes(notes),
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
